use async_trait::async_trait;
use spb_types::{
    liveness::{DeviceKey, DeviceLiveness},
    message::SparkplugMessage,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("the store is closed")]
    Closed,
}

/// Persistence for decoded messages and the queries the device directory needs.
#[async_trait]
pub trait MessageStore {
    /// Persist a decoded message
    async fn store_message(&self, message: &SparkplugMessage) -> Result<(), StoreError>;

    /// The latest birth and death of every known device
    async fn device_liveness(&self) -> Result<Vec<DeviceLiveness>, StoreError>;

    /// The latest birth and death of a single device, `None` when it has never been born
    async fn device_info(&self, key: &DeviceKey) -> Result<Option<DeviceLiveness>, StoreError>;

    /// Composite rows of the metrics in the device's latest birth
    async fn metric_rows(&self, key: &DeviceKey) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Release the store's connection
    async fn close(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: MessageStore + Send + Sync + ?Sized> MessageStore for std::sync::Arc<S> {
    async fn store_message(&self, message: &SparkplugMessage) -> Result<(), StoreError> {
        (**self).store_message(message).await
    }

    async fn device_liveness(&self) -> Result<Vec<DeviceLiveness>, StoreError> {
        (**self).device_liveness().await
    }

    async fn device_info(&self, key: &DeviceKey) -> Result<Option<DeviceLiveness>, StoreError> {
        (**self).device_info(key).await
    }

    async fn metric_rows(&self, key: &DeviceKey) -> Result<Vec<Vec<u8>>, StoreError> {
        (**self).metric_rows(key).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        (**self).close().await
    }
}
