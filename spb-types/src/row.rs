//! Composite row codec.
//!
//! The store returns each stored metric as a single text-mode composite literal:
//!
//! ```text
//! (name,alias,"timestamp",dataType,isHistorical,isTransient,isNull,metadata,properties,
//!  string,bool,int32,uint64,double,float)
//! ```
//!
//! An empty unquoted field is absent, `""` is an empty string. Decoding is fail-fast: the first
//! field that cannot be parsed stops the decode, and [RowDecoder::decode_partial] hands back
//! whatever was populated up to that point.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    datatype::{datatype_from_code, MAX_DATATYPE_CODE},
    payload::DataType,
    MetaData, MetricRecord, MetricValue, ValueTag,
};

/// Number of positional fields in a composite row
pub const ROW_FIELD_COUNT: usize = 15;
const METADATA_FIELD_COUNT: usize = 8;

const NAME: usize = 0;
const ALIAS: usize = 1;
const TIMESTAMP: usize = 2;
const DATATYPE: usize = 3;
const IS_HISTORICAL: usize = 4;
const IS_TRANSIENT: usize = 5;
const IS_NULL: usize = 6;
const METADATA: usize = 7;
const STRING_VALUE: usize = 9;
const BOOL_VALUE: usize = 10;
const INT_VALUE: usize = 11;
const LONG_VALUE: usize = 12;
const DOUBLE_VALUE: usize = 13;
const FLOAT_VALUE: usize = 14;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%:z"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("required field is missing")]
    Missing,
    #[error("invalid integer \"{0}\"")]
    InvalidInteger(String),
    #[error("invalid float \"{0}\"")]
    InvalidFloat(String),
    #[error("invalid boolean \"{0}\", expected t or f")]
    InvalidBool(String),
    #[error("invalid timestamp \"{0}\"")]
    InvalidTimestamp(String),
    #[error("unknown datatype code {0}")]
    UnknownDataType(u32),
    #[error("invalid metadata \"{0}\"")]
    InvalidMetadata(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("unexpected row shape: {0}")]
    UnexpectedRowShape(String),
    #[error("field {index}: {cause}")]
    FieldParse { index: usize, cause: FieldError },
}

impl RowError {
    fn field(index: usize, cause: FieldError) -> Self {
        RowError::FieldParse { index, cause }
    }
}

/// How a row is split into fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuotePolicy {
    /// Commas inside double quotes belong to the field. `""` and backslash escapes are
    /// unescaped and a row must have exactly [ROW_FIELD_COUNT] fields.
    #[default]
    Aware,
    /// Split on every comma and trim a single leading and trailing quote from each field.
    /// A quoted field containing a comma shifts every later field. Metadata is not decoded.
    Legacy,
}

/// The fields decoded from a row, in positional order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRow {
    pub name: Option<String>,
    pub alias: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub data_type: Option<DataType>,
    pub is_historical: Option<bool>,
    pub is_transient: Option<bool>,
    pub is_null: Option<bool>,
    pub metadata: Option<MetaData>,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub int_value: Option<i32>,
    pub long_value: Option<u64>,
    pub double_value: Option<f64>,
    pub float_value: Option<f32>,
}

impl PartialRow {
    /// Build a record, failing with [FieldError::Missing] for the first absent required field
    pub fn into_record(self) -> Result<MetricRecord, RowError> {
        let missing = |index| RowError::field(index, FieldError::Missing);

        let name = self.name.clone().ok_or_else(|| missing(NAME))?;
        let timestamp = self.timestamp.ok_or_else(|| missing(TIMESTAMP))?;
        let data_type = self.data_type.ok_or_else(|| missing(DATATYPE))?;
        let is_historical = self.is_historical.ok_or_else(|| missing(IS_HISTORICAL))?;
        let is_transient = self.is_transient.ok_or_else(|| missing(IS_TRANSIENT))?;
        let is_null = self.is_null.ok_or_else(|| missing(IS_NULL))?;
        let value = self.resolve_value(data_type);

        Ok(MetricRecord {
            name,
            alias: self.alias,
            timestamp,
            data_type,
            is_historical,
            is_transient,
            is_null,
            metadata: self.metadata,
            properties: None,
            value,
        })
    }

    fn resolve_value(&self, data_type: DataType) -> MetricValue {
        let string = || self.string_value.clone().map(MetricValue::String);
        let boolean = || self.bool_value.map(MetricValue::Bool);
        let int = || self.int_value.map(MetricValue::Int32);
        let long = || self.long_value.map(MetricValue::UInt64);
        let double = || self.double_value.map(MetricValue::Float64);
        let float = || self.float_value.map(MetricValue::Float32);

        let value = match ValueTag::for_datatype(data_type) {
            ValueTag::String => string(),
            ValueTag::Bool => boolean(),
            ValueTag::Int32 => int(),
            ValueTag::UInt64 => long(),
            ValueTag::Float64 => double(),
            ValueTag::Float32 => float(),
            ValueTag::Null if data_type == DataType::Unknown => string()
                .or_else(boolean)
                .or_else(int)
                .or_else(long)
                .or_else(double)
                .or_else(float),
            ValueTag::Null => None,
        };
        value.unwrap_or(MetricValue::Null)
    }
}

/// A failed decode together with the fields populated before the failure
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct PartialRowError {
    pub partial: PartialRow,
    #[source]
    pub error: RowError,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Field {
    text: String,
    quoted: bool,
}

impl Field {
    fn value(&self) -> Option<&str> {
        if !self.quoted && self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TokenState {
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted section, either closing it or the first half of `""`
    QuotedQuote,
    Escape { quoted: bool },
}

fn tokenize_aware(body: &str) -> Result<Vec<Field>, String> {
    let mut fields = Vec::new();
    let mut current = Field::default();
    let mut state = TokenState::Unquoted;

    for c in body.chars() {
        state = match (state, c) {
            (TokenState::Unquoted, ',') | (TokenState::QuotedQuote, ',') => {
                fields.push(std::mem::take(&mut current));
                TokenState::Unquoted
            }
            (TokenState::Unquoted, '"') => {
                current.quoted = true;
                TokenState::Quoted
            }
            (TokenState::Unquoted, '\\') => TokenState::Escape { quoted: false },
            (TokenState::Quoted, '"') => TokenState::QuotedQuote,
            (TokenState::Quoted, '\\') => TokenState::Escape { quoted: true },
            (TokenState::QuotedQuote, '"') => {
                current.text.push('"');
                TokenState::Quoted
            }
            (TokenState::Escape { quoted }, c) => {
                current.text.push(c);
                if quoted {
                    TokenState::Quoted
                } else {
                    TokenState::Unquoted
                }
            }
            (TokenState::Quoted, c) => {
                current.text.push(c);
                TokenState::Quoted
            }
            (TokenState::Unquoted, c) | (TokenState::QuotedQuote, c) => {
                current.text.push(c);
                TokenState::Unquoted
            }
        };
    }

    match state {
        TokenState::Quoted | TokenState::Escape { quoted: true } => {
            Err("unterminated quoted field".to_string())
        }
        TokenState::Escape { quoted: false } => Err("dangling escape".to_string()),
        TokenState::Unquoted | TokenState::QuotedQuote => {
            fields.push(current);
            Ok(fields)
        }
    }
}

fn tokenize_legacy(body: &str) -> Vec<Field> {
    body.split(',')
        .map(|raw| {
            let stripped = raw.strip_prefix('"');
            let quoted = stripped.is_some();
            let text = stripped.unwrap_or(raw);
            let text = text.strip_suffix('"').unwrap_or(text);
            Field {
                text: text.to_string(),
                quoted,
            }
        })
        .collect()
}

/// Strip the outer parentheses. The leading one is required, the trailing one is optional so
/// that a truncated literal still decodes.
fn row_body(row: &str) -> Option<&str> {
    let body = row.trim().strip_prefix('(')?;
    Some(body.strip_suffix(')').unwrap_or(body))
}

fn parse_bool(s: &str) -> Result<bool, FieldError> {
    match s {
        "t" => Ok(true),
        "f" => Ok(false),
        other => Err(FieldError::InvalidBool(other.to_string())),
    }
}

fn parse_i64(s: &str) -> Result<i64, FieldError> {
    s.parse().map_err(|_| FieldError::InvalidInteger(s.to_string()))
}

fn parse_i32(s: &str) -> Result<i32, FieldError> {
    s.parse().map_err(|_| FieldError::InvalidInteger(s.to_string()))
}

/// Negative values are the bits of a signed Int64
fn parse_u64(s: &str) -> Result<u64, FieldError> {
    s.parse::<u64>()
        .or_else(|_| s.parse::<i64>().map(|v| v as u64))
        .map_err(|_| FieldError::InvalidInteger(s.to_string()))
}

fn parse_f64(s: &str) -> Result<f64, FieldError> {
    s.parse().map_err(|_| FieldError::InvalidFloat(s.to_string()))
}

fn parse_f32(s: &str) -> Result<f32, FieldError> {
    s.parse().map_err(|_| FieldError::InvalidFloat(s.to_string()))
}

fn parse_datatype(s: &str) -> Result<DataType, FieldError> {
    let code: u32 = s
        .parse()
        .map_err(|_| FieldError::InvalidInteger(s.to_string()))?;
    if code > MAX_DATATYPE_CODE {
        return Err(FieldError::UnknownDataType(code));
    }
    datatype_from_code(code).ok_or(FieldError::UnknownDataType(code))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, FieldError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(s, format).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FieldError::InvalidTimestamp(s.to_string()))
}

fn parse_metadata(s: &str) -> Result<MetaData, FieldError> {
    let invalid = || FieldError::InvalidMetadata(s.to_string());
    let body = row_body(s).ok_or_else(invalid)?;
    let fields = tokenize_aware(body).map_err(|_| invalid())?;
    if fields.len() != METADATA_FIELD_COUNT {
        return Err(invalid());
    }

    let text = |index: usize| fields[index].value().map(str::to_string);
    let parse = |index: usize| -> Result<Option<i64>, FieldError> {
        fields[index].value().map(parse_i64).transpose().map_err(|_| invalid())
    };

    Ok(MetaData {
        is_multi_part: fields[0]
            .value()
            .map(parse_bool)
            .transpose()
            .map_err(|_| invalid())?,
        content_type: text(1),
        size: parse(2)?,
        sequence: parse(3)?,
        file_name: text(4),
        file_type: text(5),
        md5: text(6),
        description: text(7),
    })
}

fn optional<T>(
    fields: &[Field],
    index: usize,
    parse: impl FnOnce(&str) -> Result<T, FieldError>,
) -> Result<Option<T>, RowError> {
    match fields.get(index).and_then(Field::value) {
        Some(text) => parse(text).map(Some).map_err(|cause| RowError::field(index, cause)),
        None => Ok(None),
    }
}

fn required<T>(
    fields: &[Field],
    index: usize,
    parse: impl FnOnce(&str) -> Result<T, FieldError>,
) -> Result<Option<T>, RowError> {
    match optional(fields, index, parse)? {
        Some(value) => Ok(Some(value)),
        None => Err(RowError::field(index, FieldError::Missing)),
    }
}

/// Decodes composite rows under a [QuotePolicy]
#[derive(Debug, Clone, Copy, Default)]
pub struct RowDecoder {
    policy: QuotePolicy,
}

impl RowDecoder {
    pub fn new(policy: QuotePolicy) -> Self {
        Self { policy }
    }

    pub fn decode(&self, raw: &[u8]) -> Result<MetricRecord, RowError> {
        self.decode_partial(raw)
            .map_err(|e| e.error)?
            .into_record()
    }

    /// Decode a row, returning the fields populated before a failure alongside the error
    pub fn decode_partial(&self, raw: &[u8]) -> Result<PartialRow, PartialRowError> {
        let shape_error = |reason: String| PartialRowError {
            partial: PartialRow::default(),
            error: RowError::UnexpectedRowShape(reason),
        };

        let row = std::str::from_utf8(raw).map_err(|e| shape_error(e.to_string()))?;
        let body = row_body(row).ok_or_else(|| shape_error("missing opening parenthesis".into()))?;
        let fields = match self.policy {
            QuotePolicy::Aware => {
                let fields = tokenize_aware(body).map_err(shape_error)?;
                if fields.len() != ROW_FIELD_COUNT {
                    return Err(shape_error(format!(
                        "expected {ROW_FIELD_COUNT} fields, got {}",
                        fields.len()
                    )));
                }
                fields
            }
            QuotePolicy::Legacy => tokenize_legacy(body),
        };

        let mut partial = PartialRow::default();
        match self.fill(&mut partial, &fields) {
            Ok(()) => Ok(partial),
            Err(error) => Err(PartialRowError { partial, error }),
        }
    }

    fn fill(&self, row: &mut PartialRow, fields: &[Field]) -> Result<(), RowError> {
        let text = |s: &str| -> Result<String, FieldError> { Ok(s.to_string()) };

        row.name = required(fields, NAME, text)?;
        row.alias = optional(fields, ALIAS, parse_i64)?;
        row.timestamp = required(fields, TIMESTAMP, parse_timestamp)?;
        row.data_type = required(fields, DATATYPE, parse_datatype)?;
        row.is_historical = required(fields, IS_HISTORICAL, parse_bool)?;
        row.is_transient = required(fields, IS_TRANSIENT, parse_bool)?;
        row.is_null = required(fields, IS_NULL, parse_bool)?;
        if self.policy == QuotePolicy::Aware {
            row.metadata = optional(fields, METADATA, parse_metadata)?;
        }
        row.string_value = optional(fields, STRING_VALUE, text)?;
        row.bool_value = optional(fields, BOOL_VALUE, parse_bool)?;
        row.int_value = optional(fields, INT_VALUE, parse_i32)?;
        row.long_value = optional(fields, LONG_VALUE, parse_u64)?;
        row.double_value = optional(fields, DOUBLE_VALUE, parse_f64)?;
        row.float_value = optional(fields, FLOAT_VALUE, parse_f32)?;
        Ok(())
    }
}

/// Decode a row with the default [QuotePolicy::Aware] policy
pub fn decode_row(raw: &[u8]) -> Result<MetricRecord, RowError> {
    RowDecoder::default().decode(raw)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn bool_literal(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "f"
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn encode_metadata(metadata: &MetaData) -> String {
    let text = |s: &Option<String>| s.as_deref().map(quote).unwrap_or_default();
    let fields = [
        metadata.is_multi_part.map(bool_literal).unwrap_or_default().to_string(),
        text(&metadata.content_type),
        opt(metadata.size),
        opt(metadata.sequence),
        text(&metadata.file_name),
        text(&metadata.file_type),
        text(&metadata.md5),
        text(&metadata.description),
    ];
    format!("({})", fields.join(","))
}

/// Encode a record into the composite row literal accepted by [RowDecoder].
///
/// Properties are not encoded and the timestamp is written with millisecond precision.
pub fn encode_row(record: &MetricRecord) -> String {
    let mut slots: [String; 6] = Default::default();
    match &record.value {
        MetricValue::Null => (),
        MetricValue::String(v) => slots[0] = quote(v),
        MetricValue::Bool(v) => slots[1] = bool_literal(*v).to_string(),
        MetricValue::Int32(v) => slots[2] = v.to_string(),
        MetricValue::UInt64(v) => slots[3] = v.to_string(),
        MetricValue::Float64(v) => slots[4] = v.to_string(),
        MetricValue::Float32(v) => slots[5] = v.to_string(),
    }

    let fields = [
        quote(&record.name),
        opt(record.alias),
        quote(&record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f+00").to_string()),
        (record.data_type as u32).to_string(),
        bool_literal(record.is_historical).to_string(),
        bool_literal(record.is_transient).to_string(),
        bool_literal(record.is_null).to_string(),
        record
            .metadata
            .as_ref()
            .map(|m| quote(&encode_metadata(m)))
            .unwrap_or_default(),
        String::new(),
    ];

    let mut out = String::from("(");
    out.push_str(&fields.join(","));
    for slot in slots {
        out.push(',');
        out.push_str(&slot);
    }
    out.push(')');
    out
}
