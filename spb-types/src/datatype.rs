//! Sparkplug datatype codes and their display names.

use serde::Serializer;

use crate::payload::DataType;

/// Highest datatype code defined by Sparkplug B
pub const MAX_DATATYPE_CODE: u32 = 34;

static DATATYPE_NAMES: [&str; MAX_DATATYPE_CODE as usize + 1] = [
    "Unknown",
    "Int8",
    "Int16",
    "Int32",
    "Int64",
    "UInt8",
    "UInt16",
    "UInt32",
    "UInt64",
    "Float",
    "Double",
    "Boolean",
    "String",
    "DateTime",
    "Text",
    "UUID",
    "DataSet",
    "Bytes",
    "File",
    "Template",
    "PropertySet",
    "PropertySetList",
    "Int8Array",
    "Int16Array",
    "Int32Array",
    "Int64Array",
    "UInt8Array",
    "UInt16Array",
    "UInt32Array",
    "UInt64Array",
    "FloatArray",
    "DoubleArray",
    "BooleanArray",
    "StringArray",
    "DateTimeArray",
];

/// Get the display name of a datatype code, `None` for codes outside 0..=34
pub fn datatype_name(code: u32) -> Option<&'static str> {
    DATATYPE_NAMES.get(code as usize).copied()
}

/// Iterate over every `(code, name)` pair in code order
pub fn datatype_names() -> impl Iterator<Item = (u32, &'static str)> {
    DATATYPE_NAMES
        .iter()
        .enumerate()
        .map(|(code, name)| (code as u32, *name))
}

/// Convert a datatype code into a [DataType]
pub fn datatype_from_code(code: u32) -> Option<DataType> {
    DataType::try_from(code).ok()
}

/// Returns true for the scalar datatypes (codes 1 to 15) that carry a value in a single slot
pub fn is_scalar(datatype: DataType) -> bool {
    let code = datatype as u32;
    (1..=15).contains(&code)
}

pub(crate) fn serialize_datatype<S: Serializer>(
    datatype: &DataType,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(DATATYPE_NAMES[*datatype as usize])
}
