//! Value walker: surfaces every string leaf of a JSON-like value.
//!
//! Traversal is an explicit, restartable iterator - a pure function of the
//! input value - and is finite because recursion depth is capped. Structure
//! below the cap is treated as clear (a documented limitation, not silent
//! corruption).
//!
//! Arrays are emitted twice: once as a single space-joined string (catching
//! multi-token attacks split across elements, e.g. `["rm","-rf","/"]`), then
//! element by element (catching payloads that only match without the joining
//! spaces). Object keys are emitted as text too - keys can carry payloads.

use serde_json::Value;

/// Maximum traversal depth. Sub-structure beyond this is not inspected.
pub const MAX_WALK_DEPTH: usize = 20;

/// One string surfaced by the walker.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedValue {
    /// Dotted/bracketed location hint, e.g. `cmd` or `args[2]`.
    pub path_hint: String,
    /// The surfaced text, not yet normalized.
    pub text: String,
}

enum Frame<'a> {
    Node {
        path: String,
        depth: usize,
        value: &'a Value,
    },
    Text {
        path: String,
        text: String,
    },
}

/// Lazy iterator over every string surfaced from `value`.
pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
    max_depth: usize,
}

/// Walk `value` with the default depth cap.
pub fn walk(value: &Value) -> Walk<'_> {
    walk_bounded(value, MAX_WALK_DEPTH)
}

/// Walk `value`, ignoring structure nested deeper than `max_depth`.
pub fn walk_bounded(value: &Value, max_depth: usize) -> Walk<'_> {
    Walk {
        stack: vec![Frame::Node {
            path: String::new(),
            depth: 0,
            value,
        }],
        max_depth,
    }
}

/// Scalar rendering used for the joined-array emission. Nested containers
/// contribute their compact JSON form so split tokens still concatenate.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        container => container.to_string(),
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkedValue;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Text { path, text } => {
                    return Some(WalkedValue {
                        path_hint: path,
                        text,
                    });
                }
                Frame::Node { path, depth, value } => {
                    if depth > self.max_depth {
                        continue;
                    }
                    match value {
                        Value::String(s) => {
                            return Some(WalkedValue {
                                path_hint: path,
                                text: s.clone(),
                            });
                        }
                        Value::Array(items) => {
                            // Elements first onto the stack (reversed), then
                            // the joined form on top so it is yielded first.
                            for (i, item) in items.iter().enumerate().rev() {
                                self.stack.push(Frame::Node {
                                    path: format!("{}[{}]", path, i),
                                    depth: depth + 1,
                                    value: item,
                                });
                            }
                            let joined =
                                items.iter().map(scalar_text).collect::<Vec<_>>().join(" ");
                            self.stack.push(Frame::Text { path, text: joined });
                        }
                        Value::Object(map) => {
                            for (key, val) in map.iter().rev() {
                                let child_path = if path.is_empty() {
                                    key.clone()
                                } else {
                                    format!("{}.{}", path, key)
                                };
                                self.stack.push(Frame::Node {
                                    path: child_path.clone(),
                                    depth: depth + 1,
                                    value: val,
                                });
                                self.stack.push(Frame::Text {
                                    path: child_path,
                                    text: key.clone(),
                                });
                            }
                        }
                        // Non-string scalars never reach pattern matching.
                        Value::Number(_) | Value::Bool(_) | Value::Null => {}
                    }
                }
            }
        }
        None
    }
}
