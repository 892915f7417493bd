//! Sparkplug B decoding for a telemetry host application.
//!
//! Turns an inbound subject and protobuf payload into a [message::SparkplugMessage],
//! reads stored metrics back from the store's composite row text with [row::decode_row],
//! and derives device liveness with [liveness::is_online].

pub mod constants;

mod generated {
    pub(crate) mod sparkplug_payload;
}

/// generated types
pub mod payload;

pub mod datatype;
pub mod liveness;
pub mod message;
pub mod row;
pub mod topic;
pub mod utils;

mod error;
mod metadata;
mod property_set;
mod record;
mod value;

pub use error::*;
pub use metadata::*;
pub use property_set::*;
pub use record::*;
pub use value::*;
