//! URL query-string encoding

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters left as-is by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query component
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Render a value the way it appears in a query string.
///
/// Strings are emitted without quotes, objects and arrays as JSON.
pub fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Join `name=value` pairs with `&`, percent-encoding both sides.
///
/// With `omit_nulls`, null values are skipped; otherwise they are written
/// with an empty value.
pub fn to_url_search<'a, I>(pairs: I, omit_nulls: bool) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    pairs
        .into_iter()
        .filter(|(_, value)| !(omit_nulls && value.is_null()))
        .map(|(name, value)| {
            format!("{}={}", encode_component(name), encode_component(&query_value(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_component_matches_browser() {
        assert_eq!(encode_component("env:outSR"), "env%3AoutSR");
        assert_eq!(encode_component("Points to Route Events"), "Points%20to%20Route%20Events");
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_component("{\"x\":1}"), "%7B%22x%22%3A1%7D");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn test_query_value() {
        assert_eq!(query_value(&json!("WAPR")), "WAPR");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(2927)), "2927");
        assert_eq!(query_value(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn test_to_url_search_omits_nulls() {
        let a = json!(1);
        let b = Value::Null;
        let c = json!("x y");
        let pairs = vec![("a", &a), ("b", &b), ("c", &c)];

        assert_eq!(to_url_search(pairs.clone(), true), "a=1&c=x%20y");
        assert_eq!(to_url_search(pairs, false), "a=1&b=&c=x%20y");
    }

    #[test]
    fn test_to_url_search_empty() {
        assert_eq!(to_url_search(Vec::<(&str, &Value)>::new(), true), "");
    }
}
