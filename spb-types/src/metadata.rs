use serde::Serialize;

use crate::payload;

/// Metadata describing a metric that represents a file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaData {
    pub is_multi_part: Option<bool>,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub sequence: Option<i64>,

    /// File metadata
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub md5: Option<String>,
    pub description: Option<String>,
}

impl From<payload::MetaData> for MetaData {
    fn from(value: payload::MetaData) -> Self {
        MetaData {
            is_multi_part: value.is_multi_part,
            content_type: value.content_type,
            size: value.size.map(|v| v as i64),
            sequence: value.seq.map(|v| v as i64),
            file_name: value.file_name,
            file_type: value.file_type,
            md5: value.md5,
            description: value.description,
        }
    }
}

impl From<MetaData> for payload::MetaData {
    fn from(value: MetaData) -> Self {
        payload::MetaData {
            is_multi_part: value.is_multi_part,
            content_type: value.content_type,
            size: value.size.map(|v| v as u64),
            seq: value.sequence.map(|v| v as u64),
            file_name: value.file_name,
            file_type: value.file_type,
            md5: value.md5,
            description: value.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_conversion() {
        let wire = payload::MetaData {
            is_multi_part: Some(true),
            content_type: Some("application/pdf".into()),
            size: Some(2048),
            seq: Some(1),
            file_name: Some("manual.pdf".into()),
            ..Default::default()
        };
        let metadata = MetaData::from(wire.clone());
        assert_eq!(metadata.size, Some(2048));
        assert_eq!(metadata.sequence, Some(1));
        assert_eq!(metadata.md5, None);
        assert_eq!(payload::MetaData::from(metadata), wire);
    }
}
