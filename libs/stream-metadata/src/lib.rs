//! Per-stream telemetry record for multiplexed protocol clients.
//!
//! A stream component fills a [`StreamMetadata`] as lifecycle events occur,
//! publishes it into the request's context with [`AssociationRegistry::attach`],
//! and consumers later pull it back out and call [`StreamMetadata::export`].

pub mod association;
pub mod clock;
pub mod error;
pub mod keys;
pub mod metadata;
pub mod value;

pub use association::{ASSOCIATION_KEY, AssociationRegistry, ContextContainer, ContextValue};
pub use error::MetadataError;
pub use metadata::{Milestone, StreamMetadata};
pub use value::{ExportMap, ExportValue};
