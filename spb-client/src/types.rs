use thiserror::Error;

/// A raw message received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The subject the message was published on, e.g. `spBv1//0.group.NBIRTH.node`
    pub subject: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new<S: Into<String>, P: Into<Vec<u8>>>(subject: S, payload: P) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("the subscription is closed")]
    Closed,
    #[error("invalid subject filter \"{0}\"")]
    InvalidFilter(String),
    #[error("transport error: {0}")]
    Transport(String),
}
