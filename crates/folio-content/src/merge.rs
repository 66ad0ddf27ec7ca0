//! Deep merge of a draft into stored content.
//!
//! Rules, applied key by key:
//!
//! 1. Key only in `stored`: kept unchanged.
//! 2. Key only in `draft`: taken from the draft.
//! 3. Draft value is a list: replaces the stored value wholesale.
//! 4. Both values are objects: merged recursively.
//! 5. Value kinds differ: the draft wins. Every change of kind away from a
//!    stored non-null value is reported as a [`MergeWarning`]; booleans,
//!    numbers and strings count as one scalar kind.
//! 6. Otherwise: the draft wins.
//!
//! The merge is idempotent and never drops a path the draft does not mention.

use serde_json::{Map, Value};

/// JSON value kind, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// `null`
    Null,
    /// Boolean, number or string.
    Scalar,
    /// Array.
    List,
    /// Object.
    Section,
}

impl ValueKind {
    /// Kind of a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Scalar,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Section,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Scalar => "scalar",
            Self::List => "list",
            Self::Section => "section",
        })
    }
}

/// Non-fatal observation made while merging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeWarning {
    /// The draft replaced a value of a different kind.
    TypeChanged {
        /// Dotted path of the replaced value (e.g. `faq.questions`).
        path: String,
        /// Kind of the stored value.
        stored: ValueKind,
        /// Kind of the draft value.
        draft: ValueKind,
    },
}

impl std::fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeChanged {
                path,
                stored,
                draft,
            } => write!(f, "{path}: {stored} replaced by {draft}"),
        }
    }
}

/// Merge `draft` into `stored`.
#[must_use]
pub fn merge(stored: &Map<String, Value>, draft: &Map<String, Value>) -> Map<String, Value> {
    merge_with_diagnostics(stored, draft, &mut Vec::new())
}

/// Merge `draft` into `stored`, collecting rule-5 type changes into `warnings`.
#[must_use]
pub fn merge_with_diagnostics(
    stored: &Map<String, Value>,
    draft: &Map<String, Value>,
    warnings: &mut Vec<MergeWarning>,
) -> Map<String, Value> {
    let mut path = Vec::new();
    merge_into(stored.clone(), draft, &mut path, warnings)
}

fn merge_into<'a>(
    mut merged: Map<String, Value>,
    draft: &'a Map<String, Value>,
    path: &mut Vec<&'a str>,
    warnings: &mut Vec<MergeWarning>,
) -> Map<String, Value> {
    for (key, draft_value) in draft {
        path.push(key);

        let value = match (merged.remove(key), draft_value) {
            (Some(Value::Object(stored)), Value::Object(draft)) => {
                Value::Object(merge_into(stored, draft, path, warnings))
            }
            (Some(stored), draft) => {
                let (stored_kind, draft_kind) = (ValueKind::of(&stored), ValueKind::of(draft));
                if stored_kind != draft_kind && stored_kind != ValueKind::Null {
                    warnings.push(MergeWarning::TypeChanged {
                        path: path.join("."),
                        stored: stored_kind,
                        draft: draft_kind,
                    });
                }
                draft.clone()
            }
            (None, draft) => draft.clone(),
        };

        merged.insert(key.clone(), value);
        path.pop();
    }

    merged
}
