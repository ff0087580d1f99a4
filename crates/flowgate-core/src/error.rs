//! Error types for the gate.
//!
//! Validation itself has no error path - every outcome is a total
//! [`crate::Signal`]. Errors exist only at the edges: audit export and
//! (if catalogs ever become configurable) catalog compilation, which must
//! fail fast at startup rather than silently disabling protection mid-run.

use thiserror::Error;

/// Core error type for gate operations.
#[derive(Debug, Error)]
pub enum FlowgateError {
    /// A catalog pattern failed to compile.
    #[error("catalog pattern '{pattern}' failed to compile: {source}")]
    CatalogCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Audit export could not be serialized.
    #[error("audit export failed: {0}")]
    AuditSerialize(#[from] serde_json::Error),

    /// Audit export could not be written.
    #[error("audit write failed: {0}")]
    AuditWrite(#[from] std::io::Error),
}
