use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identifies a device, or an edge node when `device_id` is empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeviceKey {
    pub group_id: String,
    pub edge_node_id: String,
    pub device_id: String,
}

impl DeviceKey {
    pub fn new<G, N, D>(group_id: G, edge_node_id: N, device_id: D) -> Self
    where
        G: Into<String>,
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            group_id: group_id.into(),
            edge_node_id: edge_node_id.into(),
            device_id: device_id.into(),
        }
    }
}

/// The most recent birth and death seen for a device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceLiveness {
    pub key: DeviceKey,
    pub last_birth: DateTime<Utc>,
    pub last_death: Option<DateTime<Utc>>,
}

impl DeviceLiveness {
    pub fn is_online(&self) -> bool {
        is_online(self.last_birth, self.last_death)
    }
}

/// A device is online when it has never died or its last death precedes its last birth.
///
/// A death at the same instant as the birth counts as offline.
pub fn is_online(last_birth: DateTime<Utc>, last_death: Option<DateTime<Utc>>) -> bool {
    match last_death {
        None => true,
        Some(death) => death < last_birth,
    }
}
