use serde_json::{Number, Value};

// Largest magnitude below which every integral f64 is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render a JSON value as 2-space-indented text inside a `<pre>` container.
///
/// Only `&`, `<` and `>` are escaped, so the container shows the JSON text
/// exactly as serialized, quotes included. Integral floats are written as
/// integers (`1.0` and `1e2` become `1` and `100`).
pub fn render_pretty(value: &Value) -> serde_json::Result<String> {
    let mut value = value.clone();
    integral_floats_to_ints(&mut value);
    let text = serde_json::to_string_pretty(&value)?;
    Ok(format!("<pre>{}</pre>", html_escape::encode_text(&text)))
}

fn integral_floats_to_ints(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if !n.is_f64() {
                return;
            }
            if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER) {
                *n = Number::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_ints),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_ints),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_object() {
        let html = render_pretty(&json!({"a": 1})).unwrap();
        assert_eq!(html, "<pre>{\n  \"a\": 1\n}</pre>");
    }

    #[test]
    fn test_render_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": true, "alpha": [1, 2]}"#).unwrap();
        let html = render_pretty(&value).unwrap();
        assert_eq!(
            html,
            "<pre>{\n  \"zeta\": true,\n  \"alpha\": [\n    1,\n    2\n  ]\n}</pre>"
        );
    }

    #[test]
    fn test_render_escapes_markup() {
        let html = render_pretty(&json!("<b>A & B</b>")).unwrap();
        assert_eq!(html, "<pre>\"&lt;b&gt;A &amp; B&lt;/b&gt;\"</pre>");
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render_pretty(&Value::Null).unwrap(), "<pre>null</pre>");
        assert_eq!(render_pretty(&json!([])).unwrap(), "<pre>[]</pre>");
    }

    #[test]
    fn test_render_integral_floats_as_integers() {
        let value: Value =
            serde_json::from_str(r#"{"a": 1.0, "b": 1e2, "c": [-0.0, 2.5], "d": 1e300}"#).unwrap();
        let html = render_pretty(&value).unwrap();
        assert!(html.contains("\"a\": 1,"));
        assert!(html.contains("\"b\": 100,"));
        assert!(html.contains("    0,\n    2.5\n"));
        assert!(html.contains("\"d\": 1e300"));
    }
}
