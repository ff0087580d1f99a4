//! Append-only audit trail.
//!
//! The audit log is a one-way output sink: no guard ever consults it, so
//! decisions can never become path-dependent on history. It is the only
//! shared mutable state in the core; appends go through a single mutex and
//! readers take snapshot copies rather than iterating live state.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::FlowgateError;
use crate::request::{Request, Source};
use crate::signal::{GuardId, Signal};

/// Final outcome recorded for one evaluated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All guards passed.
    Flows,
    /// The named guard blocked.
    Blocked(GuardId),
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flows => serializer.serialize_str("FLOWS"),
            Self::Blocked(guard) => serializer.serialize_str(&guard.to_string()),
        }
    }
}

/// One evaluated request and its decision. Corresponds 1:1 with the final
/// `Signal` returned by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub source: Source,
    pub outcome: Outcome,
    pub guidance: Option<String>,
    /// Truncated content preview; full payloads are never persisted.
    pub preview: String,
}

impl Serialize for AuditEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 4 + usize::from(self.guidance.is_some());
        let mut s = serializer.serialize_struct("AuditEntry", fields)?;
        s.serialize_field("timestamp", &self.timestamp)?;
        s.serialize_field("source", &self.source)?;
        s.serialize_field("outcome", &self.outcome)?;
        if let Some(guidance) = &self.guidance {
            s.serialize_field("guidance", guidance)?;
        }
        s.serialize_field("preview", &self.preview)?;
        s.end()
    }
}

#[derive(Serialize)]
struct AuditExport<'a> {
    exported: DateTime<Utc>,
    entries: &'a [AuditEntry],
}

/// In-memory, append-only record of every evaluated request.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision. `preview_len` bounds the stored content preview so
    /// the log cannot grow with payload size.
    pub fn record(&self, request: &Request, signal: &Signal, preview_len: usize) -> AuditEntry {
        let (outcome, guidance) = match signal {
            Signal::Flows => (Outcome::Flows, None),
            Signal::Blocked {
                guard, guidance, ..
            } => (Outcome::Blocked(*guard), Some(guidance.clone())),
        };

        let rendered = request.content.to_string();
        let preview = rendered.chars().take(preview_len).collect();

        let entry = AuditEntry {
            timestamp: Utc::now(),
            source: request.source.clone(),
            outcome,
            guidance,
            preview,
        };

        self.entries
            .lock()
            .expect("audit log mutex poisoned")
            .push(entry.clone());
        entry
    }

    /// Snapshot copy of all entries.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .expect("audit log mutex poisoned")
            .clone()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("audit log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries whose outcome was a block.
    pub fn blocked_entries(&self) -> Vec<AuditEntry> {
        self.entries()
            .into_iter()
            .filter(|e| matches!(e.outcome, Outcome::Blocked(_)))
            .collect()
    }

    /// Counts of evaluated and blocked requests.
    pub fn summary(&self) -> AuditSummary {
        let entries = self.entries();
        let blocked = entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Blocked(_)))
            .count();
        AuditSummary {
            total: entries.len(),
            blocked,
        }
    }

    /// Serialize the log as `{"exported": ..., "entries": [...]}`.
    pub fn export(&self) -> Result<String, FlowgateError> {
        let entries = self.entries();
        let export = AuditExport {
            exported: Utc::now(),
            entries: &entries,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Write the exported log to a file.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<(), FlowgateError> {
        let rendered = self.export()?;
        std::fs::write(path, rendered)?;
        Ok(())
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("audit log mutex poisoned")
            .clear();
    }
}

/// Aggregate counts over the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub blocked: usize,
}
