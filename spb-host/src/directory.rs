use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use spb_types::{
    liveness::{DeviceKey, DeviceLiveness},
    row::RowDecoder,
    MetricRecord,
};

use crate::store::{MessageStore, StoreError};

/// A device and whether it is currently online
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    #[serde(flatten)]
    pub key: DeviceKey,
    pub is_online: bool,
}

impl From<DeviceLiveness> for DeviceStatus {
    fn from(value: DeviceLiveness) -> Self {
        let is_online = value.is_online();
        Self {
            key: value.key,
            is_online,
        }
    }
}

/// A device's liveness together with the metrics of its latest birth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub key: DeviceKey,
    pub last_birth: DateTime<Utc>,
    pub last_death: Option<DateTime<Utc>>,
    pub is_online: bool,
    pub metrics: Vec<MetricRecord>,
}

/// The read path of the host
pub struct DeviceDirectory<M> {
    store: M,
    decoder: RowDecoder,
}

impl<M: MessageStore + Send + Sync> DeviceDirectory<M> {
    pub fn new(store: M) -> Self {
        Self {
            store,
            decoder: RowDecoder::default(),
        }
    }

    /// Decode stored rows with `decoder` instead of the default quote aware one
    pub fn with_row_decoder(mut self, decoder: RowDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Every known device with its status, ordered by device id then edge node id
    pub async fn list_devices(&self) -> Result<Vec<DeviceStatus>, StoreError> {
        let mut devices: Vec<DeviceStatus> = self
            .store
            .device_liveness()
            .await?
            .into_iter()
            .map(DeviceStatus::from)
            .collect();
        devices.sort_by(|a, b| {
            (&a.key.device_id, &a.key.edge_node_id).cmp(&(&b.key.device_id, &b.key.edge_node_id))
        });
        Ok(devices)
    }

    /// Look up a single device. Rows that cannot be decoded are logged and left out.
    pub async fn device(&self, key: &DeviceKey) -> Result<Option<DeviceView>, StoreError> {
        let liveness = match self.store.device_info(key).await? {
            Some(liveness) => liveness,
            None => return Ok(None),
        };

        let rows = self.store.metric_rows(key).await?;
        let mut metrics = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match self.decoder.decode(row) {
                Ok(record) => metrics.push(record),
                Err(e) => warn!("Skipping undecodable metric row {index} for {key:?}: {e}"),
            }
        }

        let is_online = liveness.is_online();
        Ok(Some(DeviceView {
            key: liveness.key,
            last_birth: liveness.last_birth,
            last_death: liveness.last_death,
            is_online,
            metrics,
        }))
    }
}
