//! Ordered name/value parameter map (spec §3.2).
//!
//! Used for URI parameters (`;k=v`), URI embedded headers (`?k=v&k=v`),
//! and the semicolon parameter lists attached to Via/Contact/Route/etc.
//! Insertion order is preserved for serialization; equality compares key
//! sets and values case-insensitively on the key, independent of order.

use std::fmt;

use crate::escape::{decode_uri_param, encode_uri_param};
use crate::error::Result;

/// An ordered, case-insensitive-key mapping from parameter name to an
/// optional value. A key with no value (a flag parameter, e.g. `lr`)
/// serializes without `=`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ParamMap {
    entries: Vec<(String, Option<String>)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;`-joined parameter string (without the leading `;`).
    /// Percent-decodes each key and value.
    pub fn parse_semicolon(input: &str) -> Result<Self> {
        Self::parse(input, ';')
    }

    /// Parse a `&`-joined embedded-header string (without the leading `?`).
    pub fn parse_ampersand(input: &str) -> Result<Self> {
        Self::parse(input, '&')
    }

    fn parse(input: &str, delim: char) -> Result<Self> {
        let mut map = Self::new();
        if input.is_empty() {
            return Ok(map);
        }
        for segment in crate::tokenizer::split_top_level(input, delim) {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((k, v)) => {
                    let key = decode_uri_param(k)?;
                    let val = decode_uri_param(v)?;
                    map.insert(key, Some(val));
                }
                None => {
                    let key = decode_uri_param(segment)?;
                    map.insert(key, None);
                }
            }
        }
        Ok(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        let value = value.map(Into::into);
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Render as a `;`-joined parameter string, without a leading `;`.
    pub fn to_semicolon_string(&self) -> String {
        self.render(';')
    }

    /// Render as a `&`-joined embedded-header string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.render('&')
    }

    fn render(&self, delim: char) -> String {
        self.entries
            .iter()
            .map(|(k, v)| match v {
                Some(val) => format!("{}={}", encode_uri_param(k), encode_uri_param(val)),
                None => encode_uri_param(k),
            })
            .collect::<Vec<_>>()
            .join(&delim.to_string())
    }
}

impl fmt::Display for ParamMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_semicolon_string())
    }
}

impl PartialEq for ParamMap {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().all(|(k, v)| {
            other
                .entries
                .iter()
                .any(|(ok, ov)| ok.eq_ignore_ascii_case(k) && ov == v)
        })
    }
}
impl Eq for ParamMap {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_insensitive_equality() {
        let mut a = ParamMap::new();
        a.insert("a", Some("1"));
        a.insert("b", Some("2"));

        let mut b = ParamMap::new();
        b.insert("b", Some("2"));
        b.insert("a", Some("1"));

        assert_eq!(a, b);
    }

    #[test]
    fn flag_parameter_has_no_equals() {
        let mut m = ParamMap::new();
        m.insert("lr", None::<&str>);
        assert_eq!(m.to_semicolon_string(), "lr");
    }

    #[test]
    fn parses_and_decodes() {
        let m = ParamMap::parse_semicolon("transport=tcp;lr;x-note=a%20b").unwrap();
        assert_eq!(m.get("transport"), Some(Some("tcp")));
        assert_eq!(m.get("lr"), Some(None));
        assert_eq!(m.get("x-note"), Some(Some("a b")));
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        let mut m = ParamMap::new();
        m.insert("Transport", Some("tcp"));
        assert_eq!(m.get("transport"), Some(Some("tcp")));
    }
}
