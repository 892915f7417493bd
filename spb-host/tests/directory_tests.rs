use std::sync::Arc;

use spb_host::{DeviceDirectory, MessageStore};
use spb_types::{
    liveness::DeviceKey,
    message::decode_message,
    row::{QuotePolicy, RowDecoder},
    MetricValue,
};
use utils::{
    payloads::{birth_payload, bool_metric, death_payload, double_metric},
    store::MemoryStore,
};

mod utils;

async fn store(store: &MemoryStore, subject: &str, payload: Vec<u8>) {
    let message = decode_message(subject, &payload).unwrap();
    store.store_message(&message).await.unwrap();
}

async fn populated_store() -> Arc<MemoryStore> {
    let memory = Arc::new(MemoryStore::default());
    let metrics = vec![
        double_metric("temp", 1_000, 20.5),
        bool_metric("running", 1_000, true),
    ];
    store(&memory, "spBv1//0.g.NBIRTH.n2", birth_payload(1_000, metrics.clone())).await;
    store(&memory, "spBv1//0.g.NDEATH.n2", death_payload(2_000)).await;
    store(&memory, "spBv1//0.g.NBIRTH.n1", birth_payload(1_000, metrics.clone())).await;
    store(&memory, "spBv1//0.g.NDEATH.n1", death_payload(500)).await;
    store(&memory, "spBv1//0.g.DBIRTH.n1.dev1", birth_payload(3_000, metrics.clone())).await;
    store(&memory, "spBv1//0.g.DDEATH.n1.dev1", death_payload(3_000)).await;
    store(&memory, "spBv1//0.g.DBIRTH.n1.dev0", birth_payload(3_000, metrics)).await;
    memory
}

#[tokio::test]
async fn list_devices_is_ordered_with_status() {
    let directory = DeviceDirectory::new(populated_store().await);
    let devices = directory.list_devices().await.unwrap();

    let summary: Vec<(&str, &str, bool)> = devices
        .iter()
        .map(|d| (d.key.device_id.as_str(), d.key.edge_node_id.as_str(), d.is_online))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("", "n1", true),
            ("", "n2", false),
            ("dev0", "n1", true),
            // death at the same instant as the birth
            ("dev1", "n1", false),
        ]
    );
}

#[tokio::test]
async fn device_view_decodes_stored_rows() {
    let memory = populated_store().await;
    let key = DeviceKey::new("g", "n1", "dev0");
    memory.push_row(key.clone(), b"not a row");

    let directory = DeviceDirectory::new(memory);
    let view = directory.device(&key).await.unwrap().unwrap();
    assert!(view.is_online);
    assert_eq!(view.last_birth.timestamp_millis(), 3_000);
    assert_eq!(view.last_death, None);
    assert_eq!(view.metrics.len(), 2);
    assert_eq!(view.metrics[0].name, "temp");
    assert_eq!(view.metrics[0].value, MetricValue::Float64(20.5));
    assert_eq!(view.metrics[1].value, MetricValue::Bool(true));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["group_id"], "g");
    assert_eq!(json["device_id"], "dev0");
    assert_eq!(json["is_online"], true);
    assert_eq!(json["metrics"][0]["data_type"], "Double");
}

#[tokio::test]
async fn unknown_device() {
    let directory = DeviceDirectory::new(populated_store().await);
    let view = directory.device(&DeviceKey::new("g", "missing", "")).await.unwrap();
    assert!(view.is_none());
}

#[tokio::test]
async fn legacy_policy_skips_names_with_commas() {
    let memory = Arc::new(MemoryStore::default());
    store(
        &memory,
        "spBv1//0.g.NBIRTH.n",
        birth_payload(
            1_000,
            vec![
                double_metric("a,b", 1_000, 1.0),
                double_metric("c", 1_000, 2.0),
            ],
        ),
    )
    .await;
    let key = DeviceKey::new("g", "n", "");

    let aware = DeviceDirectory::new(memory.clone());
    assert_eq!(aware.device(&key).await.unwrap().unwrap().metrics.len(), 2);

    let legacy =
        DeviceDirectory::new(memory).with_row_decoder(RowDecoder::new(QuotePolicy::Legacy));
    let view = legacy.device(&key).await.unwrap().unwrap();
    assert_eq!(view.metrics.len(), 1);
    assert_eq!(view.metrics[0].name, "c");
}
