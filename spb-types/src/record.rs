use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    datatype::{datatype_from_code, serialize_datatype},
    payload::{self, DataType},
    utils::datetime_from_millis,
    MetaData, MetricError, MetricValue, PropertySet,
};

/// A single decoded metric.
///
/// Produced either from a wire metric inside an inbound payload or reconstructed from a stored
/// composite row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Empty when the wire metric only carried an alias
    pub name: String,
    pub alias: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_datatype")]
    pub data_type: DataType,
    pub is_historical: bool,
    pub is_transient: bool,
    pub is_null: bool,
    pub metadata: Option<MetaData>,
    pub properties: Option<PropertySet>,
    pub value: MetricValue,
}

impl MetricRecord {
    /// Convert a wire metric.
    ///
    /// `fallback_timestamp` is the enclosing payload's timestamp, used when the metric has none.
    pub fn try_from_wire(
        metric: payload::Metric,
        fallback_timestamp: Option<u64>,
    ) -> Result<Self, MetricError> {
        let millis = metric
            .timestamp
            .or(fallback_timestamp)
            .ok_or(MetricError::MissingTimestamp)?;
        let timestamp = datetime_from_millis(millis).ok_or(MetricError::InvalidTimestamp(millis))?;

        let data_type = match metric.datatype {
            Some(code) => datatype_from_code(code).ok_or(MetricError::UnknownDataType(code))?,
            None => DataType::Unknown,
        };

        let properties = match metric.properties {
            Some(properties) => Some(PropertySet::try_from(properties)?),
            None => None,
        };

        let is_null = metric.is_null.unwrap_or(false);
        let value = if is_null {
            MetricValue::Null
        } else {
            MetricValue::from_wire(data_type, metric.value)?
        };

        Ok(MetricRecord {
            name: metric.name.unwrap_or_default(),
            alias: metric.alias.map(|a| a as i64),
            timestamp,
            data_type,
            is_historical: metric.is_historical.unwrap_or(false),
            is_transient: metric.is_transient.unwrap_or(false),
            is_null,
            metadata: metric.metadata.map(MetaData::from),
            properties,
            value,
        })
    }

    /// Name of the record's datatype, e.g. "Double"
    pub fn data_type_name(&self) -> &'static str {
        self.data_type.as_str_name()
    }
}
