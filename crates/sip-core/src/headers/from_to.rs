//! From and To headers: both share the `user-field` shape (an optional
//! display name plus a URI) with a `tag` parameter used for dialog
//! identification (spec §3.4).

use std::fmt;

use crate::error::{Error, HeaderField, Result};
use crate::params::ParamMap;
use crate::uri::Uri;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FromTo {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: ParamMap,
}

impl FromTo {
    pub fn new(uri: Uri) -> Self {
        FromTo { display_name: None, uri, params: ParamMap::new() }
    }

    pub fn tag(&self) -> Option<&str> {
        self.params.get("tag").flatten()
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.params.insert("tag", Some(tag.into()));
    }

    pub fn parse(input: &str, field: HeaderField) -> Result<FromTo> {
        let input = input.trim();
        let (display_name, rest) = super::contact::extract_display_name(input);
        let (uri_str, param_str) = match rest.strip_prefix('<') {
            Some(after) => {
                let close = after
                    .find('>')
                    .ok_or_else(|| Error::header(field, "unterminated angle-bracket URI".into()))?;
                (&after[..close], after[close + 1..].strip_prefix(';').unwrap_or(""))
            }
            None => match rest.find(';') {
                Some(idx) => (&rest[..idx], &rest[idx + 1..]),
                None => (rest, ""),
            },
        };
        let uri = Uri::parse(uri_str).map_err(|e| Error::header(field, e.to_string()))?;
        let params = ParamMap::parse_semicolon(param_str).map_err(|e| Error::header(field, e.to_string()))?;
        Ok(FromTo { display_name, uri, params })
    }
}

impl fmt::Display for FromTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            write!(f, "\"{name}\" ")?;
        }
        write!(f, "<{}>", self.uri)?;
        if !self.params.is_empty() {
            write!(f, ";{}", self.params.to_semicolon_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_parameter() {
        let from = FromTo::parse("<sip:alice@example.com>;tag=1928301774", HeaderField::From).unwrap();
        assert_eq!(from.tag(), Some("1928301774"));
    }

    #[test]
    fn to_header_without_tag_has_none() {
        let to = FromTo::parse("<sip:bob@example.com>", HeaderField::To).unwrap();
        assert_eq!(to.tag(), None);
    }
}
