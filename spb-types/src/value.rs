use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::datatype::is_scalar;
use crate::payload::{metric, property_value, DataType};

/// The value carried by a metric or property.
///
/// Each variant corresponds to one of the value slots of the Sparkplug B wire format, so the
/// tag and its payload can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum MetricValue {
    Null,
    /// Int8, Int16, Int32, UInt8, UInt16 and UInt32 values. Unsigned values keep their wire bits.
    Int32(i32),
    /// Int64, UInt64 and DateTime values. Signed values keep their wire bits.
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    /// String, Text and UUID values
    String(String),
}

/// The variant of a [MetricValue] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Null,
    Int32,
    UInt64,
    Float32,
    Float64,
    Bool,
    String,
}

impl ValueTag {
    /// The tag a value of `datatype` is stored under.
    ///
    /// Unknown and the array/complex datatypes map to [ValueTag::Null] since their payloads are not
    /// held by [MetricValue].
    pub fn for_datatype(datatype: DataType) -> Self {
        match datatype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => ValueTag::Int32,
            DataType::Int64 | DataType::UInt64 | DataType::DateTime => ValueTag::UInt64,
            DataType::Float => ValueTag::Float32,
            DataType::Double => ValueTag::Float64,
            DataType::Boolean => ValueTag::Bool,
            DataType::String | DataType::Text | DataType::Uuid => ValueTag::String,
            _ => ValueTag::Null,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("{datatype:?} value was carried in the {found} slot")]
    Mismatch {
        datatype: DataType,
        found: &'static str,
    },
}

/// A protobuf value oneof that may hold one of the scalar slots
pub(crate) trait WireValue: Sized {
    /// Name of the protobuf variant, used in error reporting
    fn variant_name(&self) -> &'static str;

    /// Convert into a [MetricValue] when the variant is a scalar slot
    fn into_scalar(self) -> Option<MetricValue>;
}

fn proto_to_i32(val: u32) -> i32 {
    i32::from_le_bytes(val.to_le_bytes())
}

fn i32_to_proto(val: i32) -> u32 {
    u32::from_le_bytes(val.to_le_bytes())
}

macro_rules! impl_wire_value {
    ($value:ty, [$($other:ident),*]) => {
        impl WireValue for $value {
            fn variant_name(&self) -> &'static str {
                match self {
                    Self::IntValue(_) => "IntValue",
                    Self::LongValue(_) => "LongValue",
                    Self::FloatValue(_) => "FloatValue",
                    Self::DoubleValue(_) => "DoubleValue",
                    Self::BooleanValue(_) => "BooleanValue",
                    Self::StringValue(_) => "StringValue",
                    $(Self::$other(_) => stringify!($other),)*
                }
            }

            fn into_scalar(self) -> Option<MetricValue> {
                let value = match self {
                    Self::IntValue(v) => MetricValue::Int32(proto_to_i32(v)),
                    Self::LongValue(v) => MetricValue::UInt64(v),
                    Self::FloatValue(v) => MetricValue::Float32(v),
                    Self::DoubleValue(v) => MetricValue::Float64(v),
                    Self::BooleanValue(v) => MetricValue::Bool(v),
                    Self::StringValue(v) => MetricValue::String(v),
                    _ => return None,
                };
                Some(value)
            }
        }
    };
}

impl_wire_value!(
    metric::Value,
    [BytesValue, DatasetValue, TemplateValue, ExtensionValue]
);
impl_wire_value!(
    property_value::Value,
    [PropertysetValue, PropertysetsValue, ExtensionValue]
);

impl MetricValue {
    pub fn tag(&self) -> ValueTag {
        match self {
            MetricValue::Null => ValueTag::Null,
            MetricValue::Int32(_) => ValueTag::Int32,
            MetricValue::UInt64(_) => ValueTag::UInt64,
            MetricValue::Float32(_) => ValueTag::Float32,
            MetricValue::Float64(_) => ValueTag::Float64,
            MetricValue::Bool(_) => ValueTag::Bool,
            MetricValue::String(_) => ValueTag::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetricValue::Null)
    }

    /// Build a value from a wire value and its datatype.
    ///
    /// Scalar datatypes must arrive in their matching slot. [DataType::Unknown] takes the tag of
    /// whichever scalar slot is populated. Array and complex datatypes produce [MetricValue::Null].
    pub fn from_wire(datatype: DataType, value: Option<metric::Value>) -> Result<Self, ValueError> {
        Self::from_wire_value(datatype, value)
    }

    pub(crate) fn from_wire_value<V: WireValue>(
        datatype: DataType,
        value: Option<V>,
    ) -> Result<Self, ValueError> {
        let value = match value {
            Some(value) => value,
            None => return Ok(MetricValue::Null),
        };

        if datatype != DataType::Unknown && !is_scalar(datatype) {
            return Ok(MetricValue::Null);
        }

        let found = value.variant_name();
        let scalar = match value.into_scalar() {
            Some(scalar) => scalar,
            None if datatype == DataType::Unknown => return Ok(MetricValue::Null),
            None => return Err(ValueError::Mismatch { datatype, found }),
        };

        if datatype != DataType::Unknown && scalar.tag() != ValueTag::for_datatype(datatype) {
            return Err(ValueError::Mismatch { datatype, found });
        }
        Ok(scalar)
    }

    /// Convert back into the protobuf metric value slot, `None` for [MetricValue::Null]
    pub fn into_wire(self) -> Option<metric::Value> {
        let value = match self {
            MetricValue::Null => return None,
            MetricValue::Int32(v) => metric::Value::IntValue(i32_to_proto(v)),
            MetricValue::UInt64(v) => metric::Value::LongValue(v),
            MetricValue::Float32(v) => metric::Value::FloatValue(v),
            MetricValue::Float64(v) => metric::Value::DoubleValue(v),
            MetricValue::Bool(v) => metric::Value::BooleanValue(v),
            MetricValue::String(v) => metric::Value::StringValue(v),
        };
        Some(value)
    }

    /// Convert back into the protobuf property value slot, `None` for [MetricValue::Null]
    pub fn into_property_wire(self) -> Option<property_value::Value> {
        let value = match self {
            MetricValue::Null => return None,
            MetricValue::Int32(v) => property_value::Value::IntValue(i32_to_proto(v)),
            MetricValue::UInt64(v) => property_value::Value::LongValue(v),
            MetricValue::Float32(v) => property_value::Value::FloatValue(v),
            MetricValue::Float64(v) => property_value::Value::DoubleValue(v),
            MetricValue::Bool(v) => property_value::Value::BooleanValue(v),
            MetricValue::String(v) => property_value::Value::StringValue(v),
        };
        Some(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Null => f.write_str("null"),
            MetricValue::Int32(v) => write!(f, "{v}"),
            MetricValue::UInt64(v) => write!(f, "{v}"),
            MetricValue::Float32(v) => write!(f, "{v}"),
            MetricValue::Float64(v) => write!(f, "{v}"),
            MetricValue::Bool(v) => write!(f, "{v}"),
            MetricValue::String(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_for_metric_value {
    ($type:ty, $variant:ident) => {
        impl From<$type> for MetricValue {
            fn from(value: $type) -> Self {
                MetricValue::$variant(value)
            }
        }
    };
}

impl_from_for_metric_value!(i32, Int32);
impl_from_for_metric_value!(u64, UInt64);
impl_from_for_metric_value!(f32, Float32);
impl_from_for_metric_value!(f64, Float64);
impl_from_for_metric_value!(bool, Bool);
impl_from_for_metric_value!(String, String);

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::String(value.to_string())
    }
}
