use spb_types::payload::{metric, DataType, Message, Metric, Payload};

pub fn double_metric(name: &str, timestamp: u64, value: f64) -> Metric {
    let mut metric = Metric::new();
    metric
        .set_name(name)
        .set_datatype(DataType::Double)
        .set_timestamp(timestamp)
        .set_value(metric::Value::DoubleValue(value));
    metric
}

pub fn bool_metric(name: &str, timestamp: u64, value: bool) -> Metric {
    let mut metric = Metric::new();
    metric
        .set_name(name)
        .set_datatype(DataType::Boolean)
        .set_timestamp(timestamp)
        .set_value(metric::Value::BooleanValue(value));
    metric
}

pub fn birth_payload(timestamp: u64, metrics: Vec<Metric>) -> Vec<u8> {
    let mut payload = Payload::with_metrics(timestamp, metrics);
    payload.seq = Some(0);
    payload.encode_to_vec()
}

pub fn death_payload(timestamp: u64) -> Vec<u8> {
    Payload::with_metrics(timestamp, vec![]).encode_to_vec()
}
