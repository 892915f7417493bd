use spb_types::{
    datatype::datatype_name,
    message::decode_message,
    payload::{metric, DataType, Message, Metric, Payload, PropertyValue as WirePropertyValue},
    payload::{property_value, PropertySet as WirePropertySet},
    row::{decode_row, encode_row},
    MessageError, MetricValue, PropertyValueKind,
};

fn device_birth() -> Vec<u8> {
    let mut level = Metric::new();
    level
        .set_name("tank/level")
        .set_alias(1)
        .set_datatype(DataType::Float)
        .set_value(metric::Value::FloatValue(0.75))
        .set_properties(WirePropertySet {
            keys: vec!["engUnit".into()],
            values: vec![WirePropertyValue {
                r#type: Some(DataType::String as u32),
                is_null: None,
                value: Some(property_value::Value::StringValue("m".into())),
            }],
        });

    let mut count = Metric::new();
    count
        .set_name("counter")
        .set_alias(2)
        .set_datatype(DataType::UInt64)
        .set_value(metric::Value::LongValue(10));

    let mut image = Metric::new();
    image
        .set_name("snapshot")
        .set_datatype(DataType::Bytes)
        .set_value(metric::Value::BytesValue(vec![0, 1, 2]));

    let mut payload = Payload::with_metrics(1_704_164_645_000, vec![level, count, image]);
    payload.seq = Some(1);
    payload.encode_to_vec()
}

#[test]
fn stored_rows_read_back_as_decoded() {
    let message = decode_message("spBv1//0.plant.DBIRTH.edge1.tank", &device_birth()).unwrap();
    assert_eq!(message.group_id, "plant");
    assert_eq!(message.edge_node_id, "edge1");
    assert_eq!(message.device_id, "tank");
    assert_eq!(message.metrics.len(), 3);

    let level = &message.metrics[0];
    let properties = level.properties.as_ref().unwrap();
    assert_eq!(
        properties.get("engUnit").unwrap().value,
        PropertyValueKind::Value(MetricValue::String("m".into()))
    );

    for record in &message.metrics {
        let row = encode_row(record);
        let decoded = decode_row(row.as_bytes()).unwrap();
        assert_eq!(decoded.name, record.name);
        assert_eq!(decoded.alias, record.alias);
        assert_eq!(decoded.timestamp, record.timestamp);
        assert_eq!(decoded.data_type, record.data_type);
        assert_eq!(decoded.value, record.value);
        // properties do not survive the row format
        assert!(decoded.properties.is_none());
    }

    assert_eq!(message.metrics[2].value, MetricValue::Null);
    assert_eq!(datatype_name(message.metrics[2].data_type as u32), Some("Bytes"));
}

#[test]
fn display_serialization() {
    let message = decode_message("spBv1//0.plant.DBIRTH.edge1.tank", &device_birth()).unwrap();
    let json = serde_json::to_value(&message.metrics[1]).unwrap();
    assert_eq!(json["name"], "counter");
    assert_eq!(json["data_type"], "UInt64");
    assert_eq!(json["value"]["type"], "UInt64");
    assert_eq!(json["value"]["value"], 10);
    assert_eq!(json["timestamp"], "2024-01-02T03:04:05Z");
}

#[test]
fn malformed_subject() {
    assert!(matches!(
        decode_message("spBv1//0.plant", &device_birth()),
        Err(MessageError::MalformedTopic { parts: 2, .. })
    ));
}
