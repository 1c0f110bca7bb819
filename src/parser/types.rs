//! Common types for parsed pages.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Header keys every tA page is expected to carry.
pub const KNOWN_KEYS: &[&str] = &[
    "title",
    "question",
    "manual",
    "volume",
    "slug",
    "dependencies",
    "status",
    "credits",
];

/// Front-matter values of a single page.
///
/// Keys are kept sorted so the JSON corpus lists header fields in
/// lexicographic order. Unknown keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageHeader {
    values: BTreeMap<String, Value>,
    invalid: bool,
}

impl PageHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a header value by key if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// The page slug, trimmed.
    pub fn slug(&self) -> Option<&str> {
        self.get_str("slug").map(str::trim)
    }

    pub fn manual(&self) -> Option<&str> {
        self.get_str("manual")
    }

    /// The volume number, coerced the same way validation coerces it.
    pub fn volume(&self) -> Option<i64> {
        self.values.get("volume").and_then(as_integer)
    }

    /// Whether validation flagged this header.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn mark_invalid(&mut self) {
        self.invalid = true;
    }

    /// Overwrite the title (used when merging translated pages).
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.insert("title", Value::String(title.into()));
    }

    /// Overwrite the question (used when merging translated pages).
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.insert("question", Value::String(question.into()));
    }
}

/// Coerce a YAML value to an integer.
///
/// Integers pass through, floats are truncated, and strings are parsed as an
/// integer first and as a float second. Everything else is rejected.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Whether a value counts as blank: null, false, zero, or an empty string,
/// sequence or mapping.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(tagged) => is_blank(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_as_integer_variants() {
        assert_eq!(as_integer(&yaml("1")), Some(1));
        assert_eq!(as_integer(&yaml("\"1\"")), Some(1));
        assert_eq!(as_integer(&yaml("1.0")), Some(1));
        assert_eq!(as_integer(&yaml("\"2.7\"")), Some(2));
        assert_eq!(as_integer(&yaml("abc")), None);
        assert_eq!(as_integer(&yaml("true")), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&yaml("~")));
        assert!(is_blank(&yaml("0")));
        assert!(is_blank(&yaml("\"\"")));
        assert!(is_blank(&yaml("[]")));
        assert!(!is_blank(&yaml("\" \"")));
        assert!(!is_blank(&yaml("1")));
    }

    #[test]
    fn test_header_overwrites() {
        let mut header = PageHeader::new();
        header.insert("title", yaml("Old"));
        header.set_title("New");
        header.set_question("Why?");

        assert_eq!(header.title(), Some("New"));
        assert_eq!(header.get_str("question"), Some("Why?"));
        assert_eq!(header.len(), 2);
    }

    #[test]
    fn test_header_keys_sorted() {
        let mut header = PageHeader::new();
        header.insert("volume", yaml("1"));
        header.insert("credits", yaml("someone"));
        header.insert("slug", yaml("intro"));

        let keys: Vec<&str> = header.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["credits", "slug", "volume"]);
    }
}
