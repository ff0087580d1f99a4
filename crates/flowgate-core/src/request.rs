//! Request model: raw content plus provenance metadata.
//!
//! Guards reason about context, not just content. A [`Source`] records where
//! a request came from, which tool it invokes, and which workspace (if any)
//! scopes its filesystem access. A [`Request`] pairs that provenance with an
//! arbitrary JSON-like content value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a request.
///
/// `origin` is required; an empty or `"unknown"` origin is itself a
/// detectable risk signal (the SOURCE guard fails it). `timestamp` is set at
/// construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Where the request came from (e.g. "document", "mcp-client").
    pub origin: String,

    /// Name of the invoked capability, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Root-scope path used for the boundary workspace exemption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Source {
    /// Create a source with the given origin, timestamped now.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            tool: None,
            workspace: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the invoked tool name.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Set the workspace scope path.
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }
}

/// One inspected unit of input.
///
/// Created once per validation call, owned solely by that call, and never
/// mutated by guards - normalization always produces new strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Provenance metadata.
    pub source: Source,

    /// Arbitrary JSON-like content under inspection.
    pub content: serde_json::Value,
}

impl Request {
    /// Wrap structured content with its source.
    pub fn new(source: Source, content: serde_json::Value) -> Self {
        Self { source, content }
    }

    /// Wrap plain text content with its source.
    pub fn from_text(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            content: serde_json::Value::String(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_builder() {
        let source = Source::new("test")
            .with_tool("git_add")
            .with_workspace("/Users/me/project");
        assert_eq!(source.origin, "test");
        assert_eq!(source.tool.as_deref(), Some("git_add"));
        assert_eq!(source.workspace.as_deref(), Some("/Users/me/project"));
    }

    #[test]
    fn test_request_from_text() {
        let request = Request::from_text(Source::new("test"), "hello");
        assert_eq!(request.content, serde_json::json!("hello"));
    }

    #[test]
    fn test_source_serialization_skips_empty_fields() {
        let source = Source::new("test");
        let json = serde_json::to_value(&source).unwrap();
        assert!(json.get("tool").is_none());
        assert!(json.get("workspace").is_none());
        assert_eq!(json["origin"], "test");
    }
}
