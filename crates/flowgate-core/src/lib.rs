//! # Flowgate Core
//!
//! A boundary guard for systems that accept natural-language-adjacent
//! instructions which may resolve into destructive operations (shell
//! commands, filesystem writes, tool invocations). Untrusted, possibly
//! obfuscated input - free text, JSON-like payloads, or tool-call requests
//! from an external agent - is inspected and either flows or is blocked
//! with a precise reason and remediation guidance.
//!
//! ## Threat Coverage
//!
//! | Layer | Component | Threats Defeated |
//! |-------|-----------|------------------|
//! | Encoding | Normalizer | Percent/hex/unicode escapes, zero-width chars, homoglyphs |
//! | Structure | Value Walker | Payloads split across array elements or hidden in keys |
//! | Content | Guard Set | Destructive commands, path escapes, dangerous verbs |
//! | Provenance | Guard Set | Requests with unverifiable origins |
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          GATE                              │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │   Request ──▶ Value Walker ──▶ Normalizer ──▶ Guard Set    │
//! │                                                 │          │
//! │             CRITICAL → SOURCE → BOUNDARY → ACTION          │
//! │                                                 │          │
//! │                 first block wins ──▶ Signal ──▶ Audit Log  │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! - **Normalize before matching.** Every surfaced string passes through the
//!   normalization boundary (recursive decoding, invisible-character
//!   stripping, NFKC + homoglyph folding, quote/backslash/noise handling)
//!   before any pattern sees it.
//! - **Deny-first, fail-closed.** Guards run in a fixed total order and
//!   short-circuit on the first block. CRITICAL runs first because its false
//!   negative is unacceptable regardless of context.
//! - **No feedback loops.** The audit log is a one-way output sink; no guard
//!   consults history, so decisions are never path-dependent.
//! - **Bounded adversarial cost.** Decode rounds and traversal depth are
//!   capped, standing in for true cancellation.
//!
//! ## Usage
//!
//! ```rust
//! use flowgate_core::{Gate, Request, Source};
//!
//! let gate = Gate::default();
//!
//! // Structured tool-call content
//! let request = Request::new(
//!     Source::new("mcp-client").with_workspace("/Users/me/project"),
//!     serde_json::json!({ "path": "/Users/me/project/src/main.rs" }),
//! );
//! assert!(gate.validate(&request).is_flows());
//!
//! // Free text with an embedded tool call
//! let signal = gate.validate_text("run {\"cmd\": \"rm -rf /\"} now", "document", None);
//! assert!(signal.is_blocked());
//! ```

pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
mod guards;
pub mod normalize;
pub mod request;
pub mod signal;
pub mod validator;
pub mod walk;

pub use audit::{AuditEntry, AuditLog, AuditSummary, Outcome};
pub use config::GateConfig;
pub use error::FlowgateError;
pub use normalize::normalize;
pub use request::{Request, Source};
pub use signal::{GuardId, Signal, GUARD_ORDER};
pub use validator::Gate;
pub use walk::{walk, WalkedValue};
