use crate::metadata::Milestone;

/// Errors from the fallible helpers around a record.
///
/// Field access on `StreamMetadata` and `AssociationRegistry::retrieve`
/// never fail; only ordering checks and re-reading an export do.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{milestone} at {value}s precedes session connect at {connected}s")]
    OrderingViolation {
        milestone: Milestone,
        value: f64,
        connected: f64,
    },

    #[error("missing key '{0}'")]
    MissingKey(&'static str),

    #[error("key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("key '{key}': value out of range")]
    OutOfRange { key: &'static str },

    #[error("export must be a flat JSON object")]
    NotAnObject,

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
