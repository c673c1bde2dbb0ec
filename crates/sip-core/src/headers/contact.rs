//! Contact, Call-Info, and Geolocation headers: all three are comma-
//! separated lists of `[display-name] <uri>[;params]`-shaped entries
//! (Call-Info/Geolocation omit the display name in practice but share
//! the same angle-bracket-URI-plus-parameters shape).

use std::fmt;

use crate::error::{Error, HeaderField, Result};
use crate::params::ParamMap;
use crate::uri::Uri;

/// One Contact entry: an optional display name, the address URI, and
/// Contact-specific parameters (`q`, `expires`, …).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactEntry {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: ParamMap,
}

impl ContactEntry {
    pub fn new(uri: Uri) -> Self {
        ContactEntry { display_name: None, uri, params: ParamMap::new() }
    }

    pub fn parse(input: &str) -> Result<ContactEntry> {
        let input = input.trim();
        if input == "*" {
            return Err(Error::header(HeaderField::ContactHeader, "wildcard Contact has no URI to model".into()));
        }
        let (display_name, rest) = extract_display_name(input);
        let (uri_str, param_str) = match rest.strip_prefix('<') {
            Some(after) => {
                let close = after.find('>').ok_or_else(|| {
                    Error::header(HeaderField::ContactHeader, "unterminated angle-bracket URI".into())
                })?;
                (&after[..close], after[close + 1..].strip_prefix(';').unwrap_or(""))
            }
            None => {
                // bare URI, parameters are part of the URI's own parameter list
                match rest.find(';') {
                    Some(idx) => (&rest[..idx], &rest[idx + 1..]),
                    None => (rest, ""),
                }
            }
        };
        let uri = Uri::parse(uri_str).map_err(|e| Error::header(HeaderField::ContactHeader, e.to_string()))?;
        let params = ParamMap::parse_semicolon(param_str)
            .map_err(|e| Error::header(HeaderField::ContactHeader, e.to_string()))?;
        Ok(ContactEntry { display_name, uri, params })
    }
}

pub(crate) fn extract_display_name(input: &str) -> (Option<String>, &str) {
    if let Some(stripped) = input.strip_prefix('"') {
        if let Some(end) = stripped.find('"') {
            let name = stripped[..end].to_string();
            let rest = stripped[end + 1..].trim_start();
            return (Some(name), rest);
        }
    }
    if let Some(lt) = input.find('<') {
        let candidate = input[..lt].trim();
        if !candidate.is_empty() {
            return (Some(candidate.to_string()), &input[lt..]);
        }
    }
    (None, input)
}

impl fmt::Display for ContactEntry {
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

/// The Contact header's list of entries (spec §3.4).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactList {
    /// `None` models the wildcard `Contact: *` (REGISTER de-registration).
    pub entries: Option<Vec<ContactEntry>>,
}

impl ContactList {
    pub fn parse_header_value(input: &str) -> Result<ContactList> {
        let input = input.trim();
        if input == "*" {
            return Ok(ContactList { entries: None });
        }
        let entries = crate::tokenizer::split_top_level(input, ',')
            .into_iter()
            .map(ContactEntry::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(ContactList { entries: Some(entries) })
    }
}

impl fmt::Display for ContactList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entries {
            None => f.write_str("*"),
            Some(entries) => {
                let rendered: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
                f.write_str(&rendered.join(","))
            }
        }
    }
}

/// A Call-Info or Geolocation entry: `<uri>;params`, no display name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UriWithParams {
    pub uri: Uri,
    pub params: ParamMap,
}

impl UriWithParams {
    pub fn parse(input: &str) -> Result<UriWithParams> {
        let input = input.trim();
        let after = input
            .strip_prefix('<')
            .ok_or_else(|| Error::InvalidInput(format!("expected angle-bracket URI: {input:?}")))?;
        let close = after
            .find('>')
            .ok_or_else(|| Error::InvalidInput("unterminated angle-bracket URI".into()))?;
        let uri = Uri::parse(&after[..close])?;
        let param_str = after[close + 1..].strip_prefix(';').unwrap_or("");
        let params = ParamMap::parse_semicolon(param_str)?;
        Ok(UriWithParams { uri, params })
    }

    pub fn parse_list(input: &str) -> Result<Vec<UriWithParams>> {
        crate::tokenizer::split_top_level(input, ',')
            .into_iter()
            .map(UriWithParams::parse)
            .collect()
    }
}

impl fmt::Display for UriWithParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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
    fn serializes_display_name_and_params() {
        let list = ContactList::parse_header_value(
            r#""Alice" <sip:a@h>,<sip:b@h>;expires=60"#,
        )
        .unwrap();
        assert_eq!(list.to_string(), r#""Alice" <sip:a@h>,<sip:b@h>;expires=60"#);
    }

    #[test]
    fn wildcard_contact_has_no_entries() {
        let list = ContactList::parse_header_value("*").unwrap();
        assert!(list.entries.is_none());
        assert_eq!(list.to_string(), "*");
    }

    #[test]
    fn bare_uri_without_angle_brackets() {
        let list = ContactList::parse_header_value("sip:bob@example.com;expires=30").unwrap();
        let entries = list.entries.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].params.get("expires"), Some(Some("30")));
    }
}
