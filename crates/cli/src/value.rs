//! Text ↔ Value conversion for shell input and output.

use kvqueue::Value;

/// Parse a shell argument into a Value.
///
/// Tries integer, float, `true`/`false` and `null` in that order; anything
/// else is a string.
pub fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        // "inf" and "nan" parse as floats but are meant as words
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}

/// Render a Value for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        }
        Value::String(s) => format!("{:?}", s),
        Value::Bytes(b) => format!("<{} bytes>", b.len()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let parts: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{:?}: {}", k, format_value(&map[k])))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}
