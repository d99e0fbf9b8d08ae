use serde_json::Value;

/// Turn user-supplied text into a value without evaluating anything.
///
/// Accepted, in order:
/// - JSON (`42`, `-1.5`, `true`, `null`, `"s"`, `[1, 2]`, `{"k": 1}`)
/// - `True` / `False` / `None`
/// - a single-quoted string `'text'` (no escapes)
///
/// Anything else is kept as the raw string.
pub fn parse_literal(text: &str) -> Value {
    let trimmed = text.trim();

    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return v;
    }

    match trimmed {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        "None" => return Value::Null,
        _ => {}
    }

    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Value::String(inner.to_string());
    }

    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_literals() {
        assert_eq!(parse_literal("42"), json!(42));
        assert_eq!(parse_literal(" [1, 2] "), json!([1, 2]));
        assert_eq!(parse_literal("{\"k\": null}"), json!({"k": null}));
        assert_eq!(parse_literal("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn python_style_constants() {
        assert_eq!(parse_literal("True"), json!(true));
        assert_eq!(parse_literal("None"), Value::Null);
        assert_eq!(parse_literal("'single'"), json!("single"));
    }

    #[test]
    fn code_is_just_a_string() {
        assert_eq!(parse_literal("__import__('os')"), json!("__import__('os')"));
        assert_eq!(parse_literal("1 + 1"), json!("1 + 1"));
    }
}
