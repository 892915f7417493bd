use thiserror::Error;

use crate::{PropertySetError, ValueError};

/// Errors produced when turning an inbound subject and payload into a message
#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    #[error("malformed topic \"{subject}\": expected at least 4 segments, got {parts}")]
    MalformedTopic { subject: String, parts: usize },
    #[error("payload decode error: {0}")]
    PayloadDecode(#[from] prost::DecodeError),
    #[error("invalid metric at index {index}: {source}")]
    InvalidMetric { index: usize, source: MetricError },
}

/// Errors produced when converting a wire metric into a [crate::MetricRecord]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    #[error("metric and payload both lack a timestamp")]
    MissingTimestamp,
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(u64),
    #[error("unknown datatype code {0}")]
    UnknownDataType(u32),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    PropertySet(#[from] PropertySetError),
}
