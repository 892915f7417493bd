use std::{fmt, str::FromStr};

use crate::{
    constants::{
        DBIRTH, DCMD, DDATA, DDEATH, MIN_SUBJECT_PARTS, NBIRTH, NCMD, NDATA, NDEATH, STATE,
        SUBJECT_SEPARATOR,
    },
    MessageError,
};

/// The Sparkplug verb carried by the message type segment of a topic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    NBirth,
    NDeath,
    NData,
    NCmd,
    DBirth,
    DDeath,
    DData,
    DCmd,
    State,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::NBirth => NBIRTH,
            MessageType::NDeath => NDEATH,
            MessageType::NData => NDATA,
            MessageType::NCmd => NCMD,
            MessageType::DBirth => DBIRTH,
            MessageType::DDeath => DDEATH,
            MessageType::DData => DDATA,
            MessageType::DCmd => DCMD,
            MessageType::State => STATE,
        }
    }

    pub fn is_birth(&self) -> bool {
        matches!(self, MessageType::NBirth | MessageType::DBirth)
    }

    pub fn is_death(&self) -> bool {
        matches!(self, MessageType::NDeath | MessageType::DDeath)
    }

    /// True for the verbs addressed to a device rather than an edge node
    pub fn is_device(&self) -> bool {
        matches!(
            self,
            MessageType::DBirth | MessageType::DDeath | MessageType::DData | MessageType::DCmd
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let message_type = match s {
            NBIRTH => MessageType::NBirth,
            NDEATH => MessageType::NDeath,
            NDATA => MessageType::NData,
            NCMD => MessageType::NCmd,
            DBIRTH => MessageType::DBirth,
            DDEATH => MessageType::DDeath,
            DDATA => MessageType::DData,
            DCMD => MessageType::DCmd,
            STATE => MessageType::State,
            other => return Err(UnknownMessageType(other.to_string())),
        };
        Ok(message_type)
    }
}

/// The structural components of a Sparkplug subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicParts {
    pub namespace: String,
    pub group_id: String,
    pub message_type: String,
    pub edge_node_id: String,
    /// Empty for edge node messages
    pub device_id: String,
}

impl TopicParts {
    /// Classify the message type segment, `None` when it is not a known Sparkplug verb
    pub fn kind(&self) -> Option<MessageType> {
        self.message_type.parse().ok()
    }
}

/// Split a dot-delimited subject into its components.
///
/// Subjects have the shape `<namespace>.<group>.<message type>.<edge node>[.<device>]`.
/// Segments after the device id are ignored and segment contents are not validated.
pub fn parse_topic(subject: &str) -> Result<TopicParts, MessageError> {
    let parts: Vec<&str> = subject.split(SUBJECT_SEPARATOR).collect();
    if parts.len() < MIN_SUBJECT_PARTS {
        return Err(MessageError::MalformedTopic {
            subject: subject.to_string(),
            parts: parts.len(),
        });
    }

    Ok(TopicParts {
        namespace: parts[0].to_string(),
        group_id: parts[1].to_string(),
        message_type: parts[2].to_string(),
        edge_node_id: parts[3].to_string(),
        device_id: parts.get(4).map(|s| s.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_topic() {
        let parts = parse_topic("spBv1//0.g.NBIRTH.n").unwrap();
        assert_eq!(parts.namespace, "spBv1//0");
        assert_eq!(parts.group_id, "g");
        assert_eq!(parts.message_type, "NBIRTH");
        assert_eq!(parts.edge_node_id, "n");
        assert_eq!(parts.device_id, "");
        assert_eq!(parts.kind(), Some(MessageType::NBirth));
    }

    #[test]
    fn device_topic() {
        let parts = parse_topic("spBv1//0.g.DDATA.n.dev1").unwrap();
        assert_eq!(parts.device_id, "dev1");
        assert!(parts.kind().unwrap().is_device());
    }

    #[test]
    fn extra_segments_ignored() {
        let parts = parse_topic("ns.g.DDATA.n.dev1.extra.more").unwrap();
        assert_eq!(parts.device_id, "dev1");
    }

    #[test]
    fn too_few_segments() {
        assert_eq!(
            parse_topic("ns.g.NDATA").unwrap_err(),
            MessageError::MalformedTopic {
                subject: "ns.g.NDATA".into(),
                parts: 3
            }
        );
        assert!(parse_topic("").is_err());
    }

    #[test]
    fn empty_segments_are_not_validated() {
        let parts = parse_topic("...").unwrap();
        assert_eq!(parts.group_id, "");
        assert_eq!(parts.kind(), None);
    }

    #[test]
    fn message_type_round_trip() {
        for message_type in [
            MessageType::NBirth,
            MessageType::NDeath,
            MessageType::NData,
            MessageType::NCmd,
            MessageType::DBirth,
            MessageType::DDeath,
            MessageType::DData,
            MessageType::DCmd,
            MessageType::State,
        ] {
            assert_eq!(message_type.as_str().parse::<MessageType>(), Ok(message_type));
        }
        assert_eq!(
            "nbirth".parse::<MessageType>(),
            Err(UnknownMessageType("nbirth".into()))
        );
        assert!(MessageType::DDeath.is_death());
        assert!(MessageType::NBirth.is_birth());
    }
}
