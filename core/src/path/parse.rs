use std::str::FromStr;

use super::types::{PathError, PathExpression, PathStep};

/// Strict integer literal: optional leading `-`, then ASCII digits only.
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

impl PathExpression {
    /// Parse a dotted/bracketed path. A leading `.` is optional.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let syntax = |offset: usize, reason: &str| PathError::Syntax {
            path: text.to_string(),
            offset,
            reason: reason.to_string(),
        };

        let body_start = usize::from(text.starts_with('.'));
        let body = &text[body_start..];
        if body.is_empty() {
            return Err(syntax(0, "empty path"));
        }

        let mut steps = Vec::new();
        let mut key = String::new();
        // Whether the current segment produced a step (key or bracket).
        let mut segment_used = false;
        let mut after_bracket = false;

        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            let offset = body_start + i;
            match c {
                '.' => {
                    if !key.is_empty() {
                        steps.push(PathStep::Key(std::mem::take(&mut key)));
                        segment_used = true;
                    }
                    if !segment_used {
                        return Err(syntax(offset, "empty segment"));
                    }
                    segment_used = false;
                    after_bracket = false;
                }
                '[' => {
                    if !key.is_empty() {
                        steps.push(PathStep::Key(std::mem::take(&mut key)));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        if c == '[' {
                            return Err(syntax(offset, "nested '['"));
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(syntax(offset, "unclosed '['"));
                    }
                    steps.push(parse_bracket(&inner).map_err(|reason| syntax(offset, reason))?);
                    segment_used = true;
                    after_bracket = true;
                }
                ']' => return Err(syntax(offset, "unmatched ']'")),
                _ => {
                    if after_bracket {
                        return Err(syntax(offset, "expected '.' or '[' after ']'"));
                    }
                    key.push(c);
                }
            }
        }

        if !key.is_empty() {
            steps.push(PathStep::Key(key));
            segment_used = true;
        }
        if !segment_used {
            return Err(syntax(text.len(), "trailing '.'"));
        }

        Ok(Self { steps, text: text.to_string() })
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `[n]` is an index (a key step), `[a:b]` a slice.
fn parse_bracket(inner: &str) -> Result<PathStep, &'static str> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Err("empty brackets");
    }

    match inner.split_once(':') {
        None => {
            let index = parse_int(inner).ok_or("index must be an integer literal")?;
            Ok(PathStep::Key(index.to_string()))
        }
        Some((start, end)) => {
            if end.contains(':') {
                return Err("slice step is not supported");
            }
            let bound = |s: &str| -> Result<Option<i64>, &'static str> {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                parse_int(s).map(Some).ok_or("slice bound must be an integer literal")
            };
            Ok(PathStep::Slice { start: bound(start)?, end: bound(end)? })
        }
    }
}
