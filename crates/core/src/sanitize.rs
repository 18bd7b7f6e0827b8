//! HTML-escaping of untrusted request input.
//!
//! Every string leaf of an incoming JSON body (and of query-string values) is
//! escaped before it reaches a handler, so stored values can never carry an
//! executable `<script>` tag. Escaping is applied recursively over nested
//! objects and arrays; non-string values pass through untouched.

use serde_json::Value;

/// Escape the characters that allow breaking out of an HTML text context.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape every string leaf of `value` in place.
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.contains(['&', '<', '>', '"', '\'', '/']) {
                *s = escape_html(s);
            }
        }
        Value::Array(items) => {
            for item in items {
                sanitize_value(item);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                sanitize_value(v);
            }
        }
        // Numbers, booleans, and nulls carry no markup.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_tag_is_neutralized() {
        let mut value = json!({ "name": "<script>alert(1)</script>Hi" });
        sanitize_value(&mut value);
        let s = value["name"].as_str().unwrap();
        assert!(!s.contains("<script>"), "escaped value: {s}");
        assert!(s.ends_with("Hi"));
    }

    #[test]
    fn test_nested_structures_are_sanitized() {
        let mut value = json!({
            "outer": {
                "items": ["safe", "<img src=x onerror=alert(1)>"],
                "count": 3,
                "flag": true
            }
        });
        sanitize_value(&mut value);
        assert_eq!(value["outer"]["items"][0], "safe");
        assert!(!value["outer"]["items"][1].as_str().unwrap().contains('<'));
        assert_eq!(value["outer"]["count"], 3);
        assert_eq!(value["outer"]["flag"], true);
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let mut value = json!({ "email": "a@b.com", "n": null });
        sanitize_value(&mut value);
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["n"], serde_json::Value::Null);
    }

    #[test]
    fn test_escape_html_covers_quote_characters() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#x27;c");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }
}
