//! Signal types for guard pipeline outcomes.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Identifies which guard produced a block.
///
/// This is a closed enumeration - the evaluation order over these guards is
/// fixed and total (`Critical → Source → Boundary → Action`). Changing the
/// order is a behavior-breaking change requiring re-certification of every
/// pass/fail fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardId {
    /// Destructive/irreversible operation signatures. Always runs first.
    Critical,
    /// Unverifiable request provenance.
    Source,
    /// Filesystem boundary escapes (traversal, sensitive absolute paths).
    Boundary,
    /// Dangerous modification verbs in values or tool names.
    Action,
}

/// The fixed, total guard evaluation order.
pub const GUARD_ORDER: [GuardId; 4] = [
    GuardId::Critical,
    GuardId::Source,
    GuardId::Boundary,
    GuardId::Action,
];

impl std::fmt::Display for GuardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "CRITICAL",
            Self::Source => "SOURCE",
            Self::Boundary => "BOUNDARY",
            Self::Action => "ACTION",
        };
        f.write_str(s)
    }
}

/// The outcome of one guard or of the whole pipeline.
///
/// A `Signal` is a pure value with no side effects, safe to compare and log.
/// Once any guard returns [`Signal::Blocked`], no subsequent guard is
/// evaluated and no further values are normalized for that request.
///
/// Serializes to the wire form consumed by downstream shells:
///
/// ```json
/// {"flows": true}
/// {"flows": false, "guard": "CRITICAL", "signal": "recursive delete", "guidance": "..."}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// No guard matched; the input may proceed.
    Flows,

    /// A guard matched; the input must not proceed.
    Blocked {
        /// Which guard blocked.
        guard: GuardId,
        /// Short label of what matched (e.g. a catalog entry name).
        signal: String,
        /// Actionable remediation text.
        guidance: String,
    },
}

impl Signal {
    /// Create a Blocked signal.
    pub fn blocked(guard: GuardId, signal: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self::Blocked {
            guard,
            signal: signal.into(),
            guidance: guidance.into(),
        }
    }

    /// Returns true if the input may proceed.
    pub fn is_flows(&self) -> bool {
        matches!(self, Self::Flows)
    }

    /// Returns true if the input was blocked.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// The blocking guard, if any.
    pub fn guard(&self) -> Option<GuardId> {
        match self {
            Self::Flows => None,
            Self::Blocked { guard, .. } => Some(*guard),
        }
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flows => {
                let mut s = serializer.serialize_struct("Signal", 1)?;
                s.serialize_field("flows", &true)?;
                s.end()
            }
            Self::Blocked {
                guard,
                signal,
                guidance,
            } => {
                let mut s = serializer.serialize_struct("Signal", 4)?;
                s.serialize_field("flows", &false)?;
                s.serialize_field("guard", guard)?;
                s.serialize_field("signal", signal)?;
                s.serialize_field("guidance", guidance)?;
                s.end()
            }
        }
    }
}
