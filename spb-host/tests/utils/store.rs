use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spb_host::{MessageStore, StoreError};
use spb_types::{
    liveness::{DeviceKey, DeviceLiveness},
    message::SparkplugMessage,
    row::encode_row,
    utils::datetime_from_millis,
    MetricRecord,
};

#[derive(Default)]
pub struct State {
    pub messages: Vec<SparkplugMessage>,
    pub births: HashMap<DeviceKey, (DateTime<Utc>, Vec<MetricRecord>)>,
    pub deaths: HashMap<DeviceKey, DateTime<Utc>>,
    /// Rows returned after the encoded birth metrics
    pub extra_rows: HashMap<DeviceKey, Vec<Vec<u8>>>,
    pub closed: bool,
    /// Messages for this group fail to store
    pub fail_group: Option<String>,
}

/// An in memory [MessageStore] keeping the latest birth and death of each device
#[derive(Default)]
pub struct MemoryStore {
    pub state: Mutex<State>,
}

impl MemoryStore {
    pub fn failing_group(group: &str) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().fail_group = Some(group.to_string());
        store
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn message_subjects(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .map(|m| {
                format!(
                    "{}.{}.{}.{}.{}",
                    m.namespace, m.group_id, m.message_type, m.edge_node_id, m.device_id
                )
            })
            .collect()
    }

    pub fn push_row(&self, key: DeviceKey, row: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .extra_rows
            .entry(key)
            .or_default()
            .push(row.to_vec());
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn store_message(&self, message: &SparkplugMessage) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(StoreError::Closed);
        }
        if state.fail_group.as_deref() == Some(message.group_id.as_str()) {
            return Err(StoreError::Query("insert rejected".into()));
        }

        let key = DeviceKey::new(&message.group_id, &message.edge_node_id, &message.device_id);
        let at = message
            .timestamp
            .and_then(datetime_from_millis)
            .unwrap_or_else(Utc::now);
        match message.kind() {
            Some(kind) if kind.is_birth() => {
                state.births.insert(key, (at, message.metrics.clone()));
            }
            Some(kind) if kind.is_death() => {
                state.deaths.insert(key, at);
            }
            _ => (),
        }
        state.messages.push(message.clone());
        Ok(())
    }

    async fn device_liveness(&self) -> Result<Vec<DeviceLiveness>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .births
            .iter()
            .map(|(key, (birth, _))| DeviceLiveness {
                key: key.clone(),
                last_birth: *birth,
                last_death: state.deaths.get(key).copied(),
            })
            .collect())
    }

    async fn device_info(&self, key: &DeviceKey) -> Result<Option<DeviceLiveness>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.births.get(key).map(|(birth, _)| DeviceLiveness {
            key: key.clone(),
            last_birth: *birth,
            last_death: state.deaths.get(key).copied(),
        }))
    }

    async fn metric_rows(&self, key: &DeviceKey) -> Result<Vec<Vec<u8>>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Vec<u8>> = state
            .births
            .get(key)
            .map(|(_, metrics)| metrics.iter().map(|m| encode_row(m).into_bytes()).collect())
            .unwrap_or_default();
        if let Some(extra) = state.extra_rows.get(key) {
            rows.extend(extra.iter().cloned());
        }
        Ok(rows)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}
