//! The gate: entry point orchestrating walker, normalizer, guards, and audit.

use serde_json::Value;
use tracing::{debug, warn};

use crate::audit::AuditLog;
use crate::config::GateConfig;
use crate::extract::{extract_candidates, infer_tool};
use crate::guards;
use crate::request::{Request, Source};
use crate::signal::{Signal, GUARD_ORDER};

/// The boundary guard.
///
/// Holds the configuration and the audit log; pattern catalogs are
/// process-wide immutable statics, so a `Gate` is cheap and safe to share
/// across threads. Validation is a pure, single-pass evaluation per call -
/// there is no session or multi-turn state.
///
/// # Evaluation order
///
/// Guards run in the fixed order `CRITICAL → SOURCE → BOUNDARY → ACTION`,
/// guard-major: each guard inspects every surfaced value before the next
/// guard runs, so a value matching both a CRITICAL and an ACTION pattern is
/// always reported as CRITICAL. Evaluation stops at the first block.
///
/// # Example
///
/// ```rust
/// use flowgate_core::{Gate, Request, Source};
///
/// let gate = Gate::default();
/// let request = Request::new(
///     Source::new("test"),
///     serde_json::json!({ "cmd": "rm -rf /" }),
/// );
/// let signal = gate.validate(&request);
/// assert!(signal.is_blocked());
/// ```
#[derive(Debug, Default)]
pub struct Gate {
    config: GateConfig,
    audit: AuditLog,
}

impl Gate {
    /// Create a gate with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            audit: AuditLog::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The audit trail. Strictly an output sink - no guard consults it.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Validate a single request: first block wins, else all-clear.
    ///
    /// Every decision is recorded in the audit log (when enabled), 1:1 with
    /// the returned signal.
    pub fn validate(&self, request: &Request) -> Signal {
        for guard in GUARD_ORDER {
            debug!(%guard, origin = %request.source.origin, "running guard");
            let signal = guards::check(guard, request, &self.config);
            if signal.is_blocked() {
                if let Signal::Blocked { signal: label, .. } = &signal {
                    warn!(%guard, %label, origin = %request.source.origin, "request blocked");
                }
                self.record(request, &signal);
                return signal;
            }
        }

        debug!(origin = %request.source.origin, "request flows");
        let signal = Signal::Flows;
        self.record(request, &signal);
        signal
    }

    /// Validate free text that may embed JSON-like tool calls.
    ///
    /// Balanced-brace candidates are extracted first (including inside
    /// fenced code blocks); each parse success becomes a [`Request`] with an
    /// inferred tool name, each parse failure is guarded as plain text. The
    /// whole normalized text is always swept as well, catching danger that
    /// spans outside any bracketed block.
    pub fn validate_text(&self, text: &str, origin: &str, workspace: Option<&str>) -> Signal {
        for candidate in extract_candidates(text, self.config.max_text_candidates) {
            let request = match serde_json::from_str::<Value>(candidate) {
                Ok(parsed) => {
                    let mut source = Source::new(origin);
                    if let Some(tool) = infer_tool(&parsed) {
                        source = source.with_tool(tool);
                    }
                    if let Some(ws) = workspace {
                        source = source.with_workspace(ws);
                    }
                    Request::new(source, parsed)
                }
                // Not valid JSON: guard the raw substring as plain text.
                Err(_) => self.text_request(candidate, origin, workspace),
            };

            let signal = self.validate(&request);
            if signal.is_blocked() {
                return signal;
            }
        }

        self.validate(&self.text_request(text, origin, workspace))
    }

    fn text_request(&self, text: &str, origin: &str, workspace: Option<&str>) -> Request {
        let mut source = Source::new(origin);
        if let Some(ws) = workspace {
            source = source.with_workspace(ws);
        }
        Request::from_text(source, text)
    }

    fn record(&self, request: &Request, signal: &Signal) {
        if self.config.audit_enabled {
            self.audit.record(request, signal, self.config.preview_len);
        }
    }
}
