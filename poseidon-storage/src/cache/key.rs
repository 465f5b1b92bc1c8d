//! Deterministic cache key generation.

use serde_json::Value;

/// Build a cache key from a prefix and optional parameters.
///
/// Without parameters the key is the prefix itself. Otherwise it is
/// `prefix:` followed by compact JSON of the parameters with object keys
/// sorted at every level, so `{a:1,b:2}` and `{b:2,a:1}` yield the same key.
pub fn generate_key(prefix: &str, params: Option<&Value>) -> String {
    match params {
        None => prefix.to_string(),
        Some(value) => {
            let mut key = String::with_capacity(prefix.len() + 32);
            key.push_str(prefix);
            key.push(':');
            write_canonical(value, &mut key);
            key
        }
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Value's Display escapes the string exactly like serde_json does
                out.push_str(&Value::String(name.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
