//! Read and write through a [`PathExpression`].
//!
//! Reads walk the step list and borrow as long as they can; only slices (and
//! string indexing) materialize new values. Writes walk the same step list
//! recursively with mutable borrows, so no path text is ever re-parsed.
//! An intermediate slice on the write path is a window onto the underlying
//! sequence: indexes after it are relative to the window, and the write lands
//! in the root.

use std::borrow::Cow;

use serde_json::Value;

use super::parse::parse_int;
use super::types::{IndexFault, PathError, PathExpression, PathStep};

/// Resolve `path` against `root`. `origin` names the data source in errors.
pub fn resolve(root: &Value, path: &str, origin: &str) -> Result<Value, PathError> {
    PathExpression::parse(path)?.resolve(root, origin)
}

/// Assign `value` at an existing location inside `root`, in place.
pub fn write(root: &mut Value, path: &str, value: Value, origin: &str) -> Result<(), PathError> {
    PathExpression::parse(path)?.write(root, value, origin)
}

/// Assign `value` at `path` and hand back the mutated root.
pub fn resolve_and_write(
    mut root: Value,
    path: &str,
    value: Value,
    origin: &str,
) -> Result<Value, PathError> {
    write(&mut root, path, value, origin)?;
    Ok(root)
}

/// Error context shared by one walk.
struct Walk<'a> {
    expr: &'a PathExpression,
    origin: &'a str,
    /// Mapping keys missing at the last step get created instead of failing.
    create_missing: bool,
}

impl Walk<'_> {
    fn dict_key(&self, key: &str) -> PathError {
        PathError::DictKey {
            origin: self.origin.to_string(),
            path: self.expr.as_str().to_string(),
            key: key.to_string(),
        }
    }

    fn list_index(&self, step: &PathStep, fault: IndexFault) -> PathError {
        PathError::ListIndex {
            origin: self.origin.to_string(),
            path: self.expr.as_str().to_string(),
            step: step.to_string(),
            fault,
        }
    }

    /// Map a possibly negative index onto `0..len`.
    fn index(&self, step: &PathStep, key: &str, len: usize) -> Result<usize, PathError> {
        let raw = parse_int(key).ok_or_else(|| self.list_index(step, IndexFault::NotAnInteger))?;
        let adjusted = if raw < 0 { raw + len as i64 } else { raw };
        if adjusted < 0 || adjusted >= len as i64 {
            return Err(self.list_index(step, IndexFault::OutOfRange { index: raw, len }));
        }
        Ok(adjusted as usize)
    }
}

/// Python slice bounds for step 1: clamp into `0..=len`, never fail.
pub(crate) fn slice_bounds(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let clamp = |bound: Option<i64>, default: usize| -> usize {
        match bound {
            None => default,
            Some(i) if i < 0 => (len as i64 + i).max(0) as usize,
            Some(i) => (i as u64).min(len as u64) as usize,
        }
    };
    let lo = clamp(start, 0);
    let hi = clamp(end, len).max(lo);
    (lo, hi)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl PathExpression {
    /// Resolve against `root`. Pure: `root` is never modified.
    pub fn resolve(&self, root: &Value, origin: &str) -> Result<Value, PathError> {
        let walk = Walk { expr: self, origin, create_missing: false };
        let mut current = Cow::Borrowed(root);
        for step in &self.steps {
            current = match current {
                Cow::Borrowed(v) => read_step(&walk, v, step)?,
                Cow::Owned(v) => Cow::Owned(read_step(&walk, &v, step)?.into_owned()),
            };
        }
        Ok(current.into_owned())
    }

    /// Assign `value` at the resolved location. Every step, the last one
    /// included, must already exist.
    pub fn write(&self, root: &mut Value, value: Value, origin: &str) -> Result<(), PathError> {
        let walk = Walk { expr: self, origin, create_missing: false };
        write_steps(&walk, root, &self.steps, value)
    }

    /// Like [`write`](Self::write), but a missing mapping key at the last
    /// step is created.
    pub fn insert(&self, root: &mut Value, value: Value, origin: &str) -> Result<(), PathError> {
        let walk = Walk { expr: self, origin, create_missing: true };
        write_steps(&walk, root, &self.steps, value)
    }
}

fn read_step<'v>(walk: &Walk<'_>, v: &'v Value, step: &PathStep) -> Result<Cow<'v, Value>, PathError> {
    match step {
        PathStep::Key(key) => match v {
            Value::Object(map) => map.get(key).map(Cow::Borrowed).ok_or_else(|| walk.dict_key(key)),
            Value::Array(items) => {
                let i = walk.index(step, key, items.len())?;
                Ok(Cow::Borrowed(&items[i]))
            }
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let i = walk.index(step, key, chars.len())?;
                Ok(Cow::Owned(Value::String(chars[i].to_string())))
            }
            other => Err(walk.list_index(step, IndexFault::NotIndexable { found: kind(other) })),
        },
        PathStep::Slice { start, end } => match v {
            Value::Array(items) => {
                let (lo, hi) = slice_bounds(*start, *end, items.len());
                Ok(Cow::Owned(Value::Array(items[lo..hi].to_vec())))
            }
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let (lo, hi) = slice_bounds(*start, *end, chars.len());
                Ok(Cow::Owned(Value::String(chars[lo..hi].iter().collect())))
            }
            other => Err(walk.list_index(step, IndexFault::NotASequence { found: kind(other) })),
        },
    }
}

fn write_steps(walk: &Walk<'_>, node: &mut Value, steps: &[PathStep], value: Value) -> Result<(), PathError> {
    let Some((step, rest)) = steps.split_first() else {
        *node = value;
        return Ok(());
    };

    match step {
        PathStep::Key(key) => match node {
            Value::Object(map) => {
                if rest.is_empty() && walk.create_missing {
                    map.insert(key.clone(), value);
                    return Ok(());
                }
                let child = map.get_mut(key).ok_or_else(|| walk.dict_key(key))?;
                write_steps(walk, child, rest, value)
            }
            Value::Array(items) => {
                let i = walk.index(step, key, items.len())?;
                write_steps(walk, &mut items[i], rest, value)
            }
            Value::String(_) => Err(walk.list_index(step, IndexFault::ReadOnly)),
            other => Err(walk.list_index(step, IndexFault::NotIndexable { found: kind(other) })),
        },
        PathStep::Slice { start, end } => match node {
            Value::Array(items) => {
                let (lo, hi) = slice_bounds(*start, *end, items.len());
                write_window(walk, items, lo, hi, step, rest, value)
            }
            Value::String(_) => Err(walk.list_index(step, IndexFault::ReadOnly)),
            other => Err(walk.list_index(step, IndexFault::NotASequence { found: kind(other) })),
        },
    }
}

/// Continue a write inside `items[lo..hi]`. `slice` is the step that opened
/// the window, used for errors on slice assignment.
fn write_window(
    walk: &Walk<'_>,
    items: &mut Vec<Value>,
    lo: usize,
    hi: usize,
    slice: &PathStep,
    steps: &[PathStep],
    value: Value,
) -> Result<(), PathError> {
    let Some((step, rest)) = steps.split_first() else {
        // Slice assignment: replace the window with the array's elements.
        let Value::Array(replacement) = value else {
            return Err(walk.list_index(slice, IndexFault::SliceNeedsArray));
        };
        items.splice(lo..hi, replacement);
        return Ok(());
    };

    match step {
        PathStep::Key(key) => {
            let i = walk.index(step, key, hi - lo)?;
            write_steps(walk, &mut items[lo + i], rest, value)
        }
        PathStep::Slice { start, end } => {
            let (a, b) = slice_bounds(*start, *end, hi - lo);
            write_window(walk, items, lo + a, lo + b, step, rest, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_slice_bounds() {
        assert_eq!(slice_bounds(Some(1), None, 3), (1, 3));
        assert_eq!(slice_bounds(None, Some(2), 3), (0, 2));
        assert_eq!(slice_bounds(Some(5), Some(9), 3), (3, 3));
        assert_eq!(slice_bounds(Some(-2), None, 3), (1, 3));
        assert_eq!(slice_bounds(Some(-10), Some(-1), 3), (0, 2));
        assert_eq!(slice_bounds(Some(2), Some(1), 3), (2, 2));
    }
}
