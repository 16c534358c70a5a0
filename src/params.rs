//! Route/query parameters and the change detector that gates reloads.
//!
//! - [`Params`] is a structurally compared mapping of parameter name to JSON
//!   value. Values may nest (`{"hoge": {"fuga": {"piyo": "PIYO"}}}`), which is
//!   what server-injected params look like.
//! - [`ParamWatch`] keeps the last observed params as an owned baseline and
//!   reports whether a fresh reading differs from it.
//!
//! # Example
//!
//! ```
//! use navigator_restore::{ParamChange, ParamWatch, Params};
//!
//! let mut watch = ParamWatch::new();
//! let first = Params::from_query_string("a=0");
//! assert_eq!(watch.observe(&first), ParamChange::Initial);
//! assert_eq!(watch.observe(&first), ParamChange::Unchanged);
//!
//! let second = Params::from_query_string("a=1");
//! assert!(watch.observe(&second).is_changed());
//! assert_eq!(watch.baseline(), Some(&second));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter mapping compared by deep structural equality.
///
/// Two mappings are equal iff they hold the same keys (in any order) and
/// every value is recursively equal. Cloning produces a fully owned copy, so
/// a stored baseline never aliases the host's live params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Read params out of an arbitrary JSON value.
    ///
    /// Anything other than an object yields empty params.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self { values: map.clone() },
            _ => Self::new(),
        }
    }

    /// Parse a query string such as `page=1&tag=a&tag=b`.
    ///
    /// A leading `?` is ignored. Repeated keys collect into an array, and a
    /// key without `=` maps to an empty string.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values = Map::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_uri_component(key);
            let value = Value::String(decode_uri_component(value));

            match values.get_mut(&key) {
                Some(Value::Array(existing)) => existing.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    values.insert(key, value);
                }
            }
        }

        Self { values }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a parameter as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    /// Get a string parameter parsed as `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get_str(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Mutably borrow the underlying JSON object.
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.values
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Percent-decode a query component; `+` becomes a space.
///
/// Invalid escapes are kept verbatim and the decoded bytes are read as
/// lossy UTF-8.
fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => match bytes.get(i + 1..i + 3).and_then(decode_hex_pair) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let hex = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(hex, 16).ok()
}

// ============================================================================
// Change detection
// ============================================================================

/// Outcome of comparing fresh params against the stored baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamChange {
    /// No baseline existed; the reading became the baseline.
    Initial,
    /// The reading equals the baseline.
    Unchanged,
    /// The reading differs; it replaced the baseline.
    Changed {
        /// The baseline that was replaced.
        older: Params,
    },
}

impl ParamChange {
    /// Check if this outcome should trigger a reload.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Tracks the last observed params of one controller instance.
#[derive(Debug, Clone, Default)]
pub struct ParamWatch {
    baseline: Option<Params>,
}

impl ParamWatch {
    /// Create a watch with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a watch seeded with a copy of `params`.
    pub fn with_baseline(params: &Params) -> Self {
        Self {
            baseline: Some(params.clone()),
        }
    }

    /// The current baseline, if one was recorded.
    pub fn baseline(&self) -> Option<&Params> {
        self.baseline.as_ref()
    }

    /// Compare `current` against the baseline.
    ///
    /// The baseline is replaced (never merged) with a copy of `current`
    /// whenever it differs or is missing.
    pub fn observe(&mut self, current: &Params) -> ParamChange {
        match self.baseline.as_mut() {
            None => {
                self.baseline = Some(current.clone());
                ParamChange::Initial
            }
            Some(baseline) if baseline == current => ParamChange::Unchanged,
            Some(baseline) => {
                let older = std::mem::replace(baseline, current.clone());
                ParamChange::Changed { older }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested() -> Params {
        Params::from_value(&json!({"hoge": {"fuga": {"piyo": "PIYO"}}, "list": [1, 2]}))
    }

    #[test]
    fn test_params_basic() {
        let mut params = Params::new();
        params.insert("id", "123");

        assert_eq!(params.get_str("id"), Some("123"));
        assert_eq!(params.get_as::<u32>("id"), Some(123));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_from_value_non_object() {
        assert!(Params::from_value(&json!("text")).is_empty());
        assert!(Params::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_key_order_irrelevant() {
        let a: Params = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Params = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = nested();
        let mut copy = original.clone();
        assert_eq!(original, copy);

        copy.as_map_mut()["hoge"]["fuga"]["piyo"] = json!("NEW_PIYO");
        assert_ne!(original, copy);
        assert_eq!(original.get("hoge").unwrap()["fuga"]["piyo"], json!("PIYO"));
    }

    #[test]
    fn test_query_string_parsing() {
        let params = Params::from_query_string("?page=1&sort=name&tag=a&tag=b&flag");

        assert_eq!(params.get_str("page"), Some("1"));
        assert_eq!(params.get_str("sort"), Some("name"));
        assert_eq!(params.get("tag"), Some(&json!(["a", "b"])));
        assert_eq!(params.get_str("flag"), Some(""));
    }

    #[test]
    fn test_query_string_decoding() {
        let params = Params::from_query_string("q=hello%20world&r=a+b&s=%E3%81%82&t=100%");
        assert_eq!(params.get_str("q"), Some("hello world"));
        assert_eq!(params.get_str("r"), Some("a b"));
        assert_eq!(params.get_str("s"), Some("あ"));
        assert_eq!(params.get_str("t"), Some("100%"));
    }

    #[test]
    fn test_empty_query_string() {
        assert!(Params::from_query_string("").is_empty());
        assert!(Params::from_query_string("?").is_empty());
    }

    #[test]
    fn test_watch_initial_then_unchanged() {
        let mut watch = ParamWatch::new();
        let params = Params::from_query_string("a=0");

        assert_eq!(watch.observe(&params), ParamChange::Initial);
        assert_eq!(watch.observe(&Params::from_query_string("a=0")), ParamChange::Unchanged);
    }

    #[test]
    fn test_watch_replaces_baseline() {
        let mut watch = ParamWatch::with_baseline(&nested());
        let mut newer = nested();
        newer.as_map_mut()["hoge"]["fuga"]["piyo"] = json!("NEW_PIYO");

        let change = watch.observe(&newer);
        assert_eq!(change, ParamChange::Changed { older: nested() });
        assert_eq!(watch.baseline(), Some(&newer));

        // Mutating the caller's copy afterwards must not move the baseline.
        newer.insert("extra", true);
        assert_ne!(watch.baseline(), Some(&newer));
    }
}
