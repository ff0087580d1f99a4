//! Configuration for the gate.

use serde::{Deserialize, Serialize};

use crate::normalize::DEFAULT_DECODE_ROUNDS;
use crate::walk::MAX_WALK_DEPTH;

/// Tunable bounds for the validation pipeline.
///
/// The recursion-depth cap and the decode-iteration cap are the internal
/// safeguards against unbounded CPU consumption from adversarial input; the
/// core performs no blocking I/O, so cancellation is otherwise the caller's
/// responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Maximum nested-decode rounds in the normalizer.
    pub max_decode_rounds: usize,

    /// Maximum traversal depth in the value walker. Structure nested deeper
    /// is treated as clear.
    pub max_walk_depth: usize,

    /// Content-preview truncation length for audit entries.
    pub preview_len: usize,

    /// Whether validation decisions are recorded in the audit log.
    pub audit_enabled: bool,

    /// Maximum number of JSON-like candidates inspected per text.
    pub max_text_candidates: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_decode_rounds: DEFAULT_DECODE_ROUNDS,
            max_walk_depth: MAX_WALK_DEPTH,
            preview_len: 100,
            audit_enabled: true,
            max_text_candidates: 64,
        }
    }
}
