//! Part of spbhost, a Sparkplug B ingest host.
//!
//! This library wires the decoders of `spb-types` to a [Subscriber](spb_client::Subscriber) and
//! a [MessageStore]: the [Ingestor] persists every inbound message and the [DeviceDirectory]
//! reads devices and their stored metrics back for display.

mod config;
mod directory;
mod ingest;
mod store;

pub use config::*;
pub use directory::*;
pub use ingest::*;
pub use store::*;
