//! Part of spbhost, a Sparkplug B ingest host.
//!
//! This library defines the [Subscriber] trait the host uses to receive raw Sparkplug messages
//! from a publish/subscribe transport, along with the types that cross that seam.
//!
//! # Feature Flags
//!
//! - `channel-subscriber`: Enables the channel based [Subscriber] implementation.
//!   Disabled by default.
//!

mod traits;
mod types;

pub use traits::{DynSubscriber, Subscriber};
pub use types::*;

/// A basic [Subscriber] implementation based on channels
///
/// Useful for writing tests where it is not appropriate to be running a real broker
#[cfg(any(feature = "channel-subscriber", doc))]
pub mod channel;
