use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::metadata::StreamMetadata;

/// Reserved key under which a record lives inside a context container.
///
/// Namespaced by crate and type so unrelated context values never collide.
pub const ASSOCIATION_KEY: &str = "stream_metadata::StreamMetadata";

/// Type-erased value stored in a context container.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// A caller-owned, string-keyed bag of context values (e.g. a request's
/// extensions). The registry only ever touches [`ASSOCIATION_KEY`].
pub trait ContextContainer {
    /// Insert `value` under `key`, returning the previous value if any.
    fn insert_value(&mut self, key: &str, value: ContextValue) -> Option<ContextValue>;

    fn value(&self, key: &str) -> Option<&ContextValue>;
}

impl ContextContainer for HashMap<String, ContextValue> {
    fn insert_value(&mut self, key: &str, value: ContextValue) -> Option<ContextValue> {
        self.insert(key.to_owned(), value)
    }

    fn value(&self, key: &str) -> Option<&ContextValue> {
        self.get(key)
    }
}

impl ContextContainer for BTreeMap<String, ContextValue> {
    fn insert_value(&mut self, key: &str, value: ContextValue) -> Option<ContextValue> {
        self.insert(key.to_owned(), value)
    }

    fn value(&self, key: &str) -> Option<&ContextValue> {
        self.get(key)
    }
}

/// Attaches one [`StreamMetadata`] to a context container and recovers it.
///
/// A container is either without a record or with exactly one; attaching
/// again replaces the record (last write wins).
pub struct AssociationRegistry;

impl AssociationRegistry {
    /// Publish `record` into `container`.
    ///
    /// The record is moved into an immutable `Arc` and inserted in a single
    /// step, so readers never observe a partially written value and the
    /// producer can no longer mutate what it published.
    pub fn attach<C: ContextContainer + ?Sized>(record: StreamMetadata, container: &mut C) {
        let stream_id = record.stream_id;
        let previous = container.insert_value(ASSOCIATION_KEY, Arc::new(record));
        if previous.is_some() {
            tracing::debug!(stream_id, "replaced stream metadata already attached to context");
        }
    }

    /// The attached record, or `None` when nothing (or something of another
    /// type) is stored under the reserved key.
    pub fn retrieve<C: ContextContainer + ?Sized>(container: &C) -> Option<Arc<StreamMetadata>> {
        let value = container.value(ASSOCIATION_KEY)?;
        match Arc::clone(value).downcast::<StreamMetadata>() {
            Ok(record) => Some(record),
            Err(_) => {
                tracing::warn!(key = ASSOCIATION_KEY, "context entry has an unexpected type, ignoring");
                None
            }
        }
    }
}
