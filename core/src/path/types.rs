use std::fmt;

use thiserror::Error;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Mapping key, or sequence index when the current value is a sequence.
    Key(String),
    /// Half-open `[start:end]` range; missing bounds mean "from the start" / "to the end".
    Slice { start: Option<i64>, end: Option<i64> },
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => write!(f, ".{k}"),
            PathStep::Slice { start, end } => {
                f.write_str("[")?;
                if let Some(s) = start {
                    write!(f, "{s}")?;
                }
                f.write_str(":")?;
                if let Some(e) = end {
                    write!(f, "{e}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A parsed path: the ordered steps plus the text they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    pub(crate) steps: Vec<PathStep>,
    pub(crate) text: String,
}

impl PathExpression {
    /// Build from steps directly.
    ///
    /// Fails on an empty step list, and on keys that the path syntax cannot
    /// express (empty, or containing `.`, `[` or `]`). Whatever is accepted
    /// here prints as text that parses back to the same steps.
    pub fn from_steps(steps: Vec<PathStep>) -> Result<Self, PathError> {
        if steps.is_empty() {
            return Err(PathError::Syntax {
                path: String::new(),
                offset: 0,
                reason: "path has no steps".into(),
            });
        }

        let mut text = String::new();
        for step in &steps {
            if let PathStep::Key(key) = step {
                let reason = if key.is_empty() {
                    Some("empty key")
                } else if key.contains(['.', '[', ']']) {
                    Some("key contains '.', '[' or ']'")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(PathError::Syntax {
                        path: steps.iter().map(ToString::to_string).collect(),
                        offset: text.len(),
                        reason: reason.into(),
                    });
                }
            }
            text.push_str(&step.to_string());
        }
        Ok(Self { steps, text })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// The path as originally written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Canonical form: `.key` per key step, `[a:b]` per slice step.
impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Why a sequence step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexFault {
    OutOfRange { index: i64, len: usize },
    NotAnInteger,
    /// Key or index applied to a scalar.
    NotIndexable { found: &'static str },
    /// Slice applied to something that is not a sequence.
    NotASequence { found: &'static str },
    /// Write into a string.
    ReadOnly,
    /// Slice assignment with a non-array value.
    SliceNeedsArray,
}

impl fmt::Display for IndexFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexFault::OutOfRange { index, len } =>
                write!(f, "index {index} out of range for length {len}"),
            IndexFault::NotAnInteger => f.write_str("sequence index is not an integer"),
            IndexFault::NotIndexable { found } => write!(f, "{found} is not indexable"),
            IndexFault::NotASequence { found } => write!(f, "cannot slice {found}"),
            IndexFault::ReadOnly => f.write_str("strings cannot be written through a path"),
            IndexFault::SliceNeedsArray => f.write_str("slice assignment needs an array value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Malformed path text.
    #[error("invalid path {path:?} at offset {offset}: {reason}")]
    Syntax { path: String, offset: usize, reason: String },

    /// Mapping has no such key.
    #[error("{origin}: key {key:?} not found (path {path:?})")]
    DictKey { origin: String, path: String, key: String },

    /// Sequence index or slice failed.
    #[error("{origin}: {fault} at {step} (path {path:?})")]
    ListIndex { origin: String, path: String, step: String, fault: IndexFault },

    /// Document text is not JSON.
    #[error("{origin}: invalid JSON: {message}")]
    InvalidJson { origin: String, message: String },
}

impl PathError {
    /// Missing key, for `DictKey` errors.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            PathError::DictKey { key, .. } => Some(key),
            _ => None,
        }
    }
}
