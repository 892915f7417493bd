//! Decoding of inbound subject and payload pairs.

use serde::Serialize;

use crate::{
    payload::{Message, Payload},
    topic::{parse_topic, MessageType},
    MessageError, MetricRecord,
};

/// A decoded Sparkplug message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparkplugMessage {
    pub namespace: String,
    pub group_id: String,
    pub message_type: String,
    pub edge_node_id: String,
    /// Empty for edge node messages
    pub device_id: String,
    pub timestamp: Option<u64>,
    pub seq: Option<u64>,
    pub metrics: Vec<MetricRecord>,
}

impl SparkplugMessage {
    pub fn kind(&self) -> Option<MessageType> {
        self.message_type.parse().ok()
    }
}

/// Decodes raw payload bytes into a Sparkplug [Payload]
pub trait PayloadDecoder {
    fn decode(&self, raw: &[u8]) -> Result<Payload, prost::DecodeError>;
}

/// [PayloadDecoder] backed by prost
#[derive(Debug, Clone, Copy, Default)]
pub struct ProstDecoder;

impl PayloadDecoder for ProstDecoder {
    fn decode(&self, raw: &[u8]) -> Result<Payload, prost::DecodeError> {
        Payload::decode(raw)
    }
}

/// Decode a message with the default [ProstDecoder]
pub fn decode_message(subject: &str, raw: &[u8]) -> Result<SparkplugMessage, MessageError> {
    decode_message_with(&ProstDecoder, subject, raw)
}

/// Decode a message with a caller supplied payload decoder.
///
/// The subject is parsed first, the payload decoder is not invoked for a malformed subject.
pub fn decode_message_with<D: PayloadDecoder + ?Sized>(
    decoder: &D,
    subject: &str,
    raw: &[u8],
) -> Result<SparkplugMessage, MessageError> {
    let topic = parse_topic(subject)?;
    let payload = decoder.decode(raw)?;

    let mut metrics = Vec::with_capacity(payload.metrics.len());
    for (index, metric) in payload.metrics.into_iter().enumerate() {
        let record = MetricRecord::try_from_wire(metric, payload.timestamp)
            .map_err(|source| MessageError::InvalidMetric { index, source })?;
        metrics.push(record);
    }

    Ok(SparkplugMessage {
        namespace: topic.namespace,
        group_id: topic.group_id,
        message_type: topic.message_type,
        edge_node_id: topic.edge_node_id,
        device_id: topic.device_id,
        timestamp: payload.timestamp,
        seq: payload.seq,
        metrics,
    })
}
