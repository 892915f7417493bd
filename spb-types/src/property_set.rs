use serde::Serialize;
use thiserror::Error;

use crate::{
    datatype::{datatype_from_code, serialize_datatype},
    payload::{self, property_value, DataType},
    MetricValue, ValueError,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropertySetError {
    #[error("property set has {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },
    #[error("property {key} has unknown datatype code {code}")]
    UnknownDataType { key: String, code: u32 },
    #[error("property {key}: {source}")]
    Value { key: String, source: ValueError },
}

/// The value held by a property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValueKind {
    Value(MetricValue),
    PropertySet(PropertySet),
    PropertySetList(Vec<PropertySet>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    #[serde(serialize_with = "serialize_datatype")]
    pub datatype: DataType,
    pub value: PropertyValueKind,
}

impl PropertyValue {
    pub fn new<V: Into<MetricValue>>(datatype: DataType, value: V) -> Self {
        Self {
            datatype,
            value: PropertyValueKind::Value(value.into()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, PropertyValueKind::Value(MetricValue::Null))
    }

    fn try_from_wire(key: &str, value: payload::PropertyValue) -> Result<Self, PropertySetError> {
        let datatype = match value.r#type {
            Some(code) => datatype_from_code(code).ok_or_else(|| PropertySetError::UnknownDataType {
                key: key.to_string(),
                code,
            })?,
            None => DataType::Unknown,
        };

        if value.is_null == Some(true) {
            return Ok(Self {
                datatype,
                value: PropertyValueKind::Value(MetricValue::Null),
            });
        }

        let kind = match value.value {
            Some(property_value::Value::PropertysetValue(set)) => {
                PropertyValueKind::PropertySet(set.try_into()?)
            }
            Some(property_value::Value::PropertysetsValue(list)) => {
                let mut sets = Vec::with_capacity(list.propertyset.len());
                for set in list.propertyset {
                    sets.push(set.try_into()?);
                }
                PropertyValueKind::PropertySetList(sets)
            }
            other => PropertyValueKind::Value(
                MetricValue::from_wire_value(datatype, other).map_err(|source| {
                    PropertySetError::Value {
                        key: key.to_string(),
                        source,
                    }
                })?,
            ),
        };
        Ok(Self {
            datatype,
            value: kind,
        })
    }
}

impl From<PropertyValue> for payload::PropertyValue {
    fn from(value: PropertyValue) -> Self {
        let datatype = value.datatype;
        let (is_null, value) = match value.value {
            PropertyValueKind::Value(MetricValue::Null) => (Some(true), None),
            PropertyValueKind::Value(v) => (None, v.into_property_wire()),
            PropertyValueKind::PropertySet(set) => {
                (None, Some(property_value::Value::PropertysetValue(set.into())))
            }
            PropertyValueKind::PropertySetList(list) => (
                None,
                Some(property_value::Value::PropertysetsValue(
                    payload::PropertySetList {
                        propertyset: list.into_iter().map(Into::into).collect(),
                    },
                )),
            ),
        };
        payload::PropertyValue {
            r#type: Some(datatype as u32),
            is_null,
            value,
        }
    }
}

/// An ordered collection of properties.
///
/// Keys and values are kept in lock-step in insertion order. Keys are not required to be unique;
/// lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySet {
    keys: Vec<String>,
    values: Vec<PropertyValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>>(&mut self, key: K, value: PropertyValue) {
        self.keys.push(key.into());
        self.values.push(value);
    }

    /// Get the first property stored under `key`
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|index| &self.values[index])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }
}

impl TryFrom<payload::PropertySet> for PropertySet {
    type Error = PropertySetError;

    fn try_from(value: payload::PropertySet) -> Result<Self, Self::Error> {
        let keys = value.keys;
        let wire_values = value.values;
        if keys.len() != wire_values.len() {
            return Err(PropertySetError::LengthMismatch {
                keys: keys.len(),
                values: wire_values.len(),
            });
        }

        let mut values = Vec::with_capacity(keys.len());
        for (key, v) in keys.iter().zip(wire_values) {
            values.push(PropertyValue::try_from_wire(key, v)?);
        }
        Ok(PropertySet { keys, values })
    }
}

impl From<PropertySet> for payload::PropertySet {
    fn from(value: PropertySet) -> Self {
        payload::PropertySet {
            keys: value.keys,
            values: value.values.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_property(datatype: DataType, value: property_value::Value) -> payload::PropertyValue {
        payload::PropertyValue {
            r#type: Some(datatype as u32),
            is_null: None,
            value: Some(value),
        }
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let wire = payload::PropertySet {
            keys: vec!["Quality".into(), "engUnit".into(), "Quality".into()],
            values: vec![
                wire_property(DataType::Int32, property_value::Value::IntValue(192)),
                wire_property(DataType::String, property_value::Value::StringValue("degC".into())),
                wire_property(DataType::Int32, property_value::Value::IntValue(0)),
            ],
        };
        let set = PropertySet::try_from(wire).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.keys(), &["Quality", "engUnit", "Quality"]);
        assert_eq!(
            set.get("Quality").unwrap().value,
            PropertyValueKind::Value(MetricValue::Int32(192))
        );
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Quality", "engUnit", "Quality"]);
    }

    #[test]
    fn length_mismatch() {
        let wire = payload::PropertySet {
            keys: vec!["a".into(), "b".into()],
            values: vec![wire_property(
                DataType::Boolean,
                property_value::Value::BooleanValue(true),
            )],
        };
        assert_eq!(
            PropertySet::try_from(wire).unwrap_err(),
            PropertySetError::LengthMismatch { keys: 2, values: 1 }
        );
    }

    #[test]
    fn nested_sets() {
        let inner = payload::PropertySet {
            keys: vec!["x".into()],
            values: vec![wire_property(
                DataType::Double,
                property_value::Value::DoubleValue(1.0),
            )],
        };
        let wire = payload::PropertySet {
            keys: vec!["nested".into(), "list".into()],
            values: vec![
                wire_property(
                    DataType::PropertySet,
                    property_value::Value::PropertysetValue(inner.clone()),
                ),
                wire_property(
                    DataType::PropertySetList,
                    property_value::Value::PropertysetsValue(payload::PropertySetList {
                        propertyset: vec![inner.clone(), inner],
                    }),
                ),
            ],
        };
        let set = PropertySet::try_from(wire).unwrap();
        match &set.get("nested").unwrap().value {
            PropertyValueKind::PropertySet(nested) => {
                assert_eq!(
                    nested.get("x").unwrap().value,
                    PropertyValueKind::Value(MetricValue::Float64(1.0))
                )
            }
            other => panic!("got {other:?}"),
        }
        match &set.get("list").unwrap().value {
            PropertyValueKind::PropertySetList(list) => assert_eq!(list.len(), 2),
            other => panic!("got {other:?}"),
        }
    }

    #[test]
    fn null_and_mismatched_values() {
        let wire = payload::PropertySet {
            keys: vec!["n".into()],
            values: vec![payload::PropertyValue {
                r#type: Some(DataType::String as u32),
                is_null: Some(true),
                value: None,
            }],
        };
        assert!(PropertySet::try_from(wire).unwrap().get("n").unwrap().is_null());

        let wire = payload::PropertySet {
            keys: vec!["bad".into()],
            values: vec![wire_property(DataType::Boolean, property_value::Value::IntValue(1))],
        };
        assert!(matches!(
            PropertySet::try_from(wire),
            Err(PropertySetError::Value { key, .. }) if key == "bad"
        ));
    }

    #[test]
    fn back_to_wire() {
        let mut set = PropertySet::new();
        set.push("engUnit", PropertyValue::new(DataType::String, "kPa"));
        set.push("empty", PropertyValue::new(DataType::Int32, MetricValue::Null));
        let wire: payload::PropertySet = set.clone().into();
        assert_eq!(wire.keys, vec!["engUnit".to_string(), "empty".to_string()]);
        assert_eq!(wire.values[1].is_null, Some(true));
        assert_eq!(PropertySet::try_from(wire).unwrap(), set);
    }
}
