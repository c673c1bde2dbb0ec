//! Singleton text headers (spec §3.4's open-ended "singleton text fields
//! per RFC 3261 §20" bucket) plus Content-Type, which gets its own typed
//! field because message validation inspects it directly.

use std::fmt;

use crate::error::{Error, HeaderField, Result};

/// Content-Type (RFC 3261 §20.15): `type "/" subtype [;params]`. Only the
/// type/subtype pair is modeled; parameters (e.g. `boundary=`) are kept
/// as raw trailing text since nothing in this crate inspects them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentType {
    pub media_type: String,
    pub media_subtype: String,
    pub params_text: Option<String>,
}

impl ContentType {
    pub fn new(media_type: impl Into<String>, media_subtype: impl Into<String>) -> Self {
        ContentType { media_type: media_type.into(), media_subtype: media_subtype.into(), params_text: None }
    }

    pub fn parse(input: &str) -> Result<ContentType> {
        let input = input.trim();
        let (media, params_text) = match input.find(';') {
            Some(idx) => (&input[..idx], Some(input[idx + 1..].trim().to_string())),
            None => (input, None),
        };
        let slash = media
            .find('/')
            .ok_or_else(|| Error::header(HeaderField::ContentType, format!("missing '/': {media:?}")))?;
        let media_type = media[..slash].trim().to_string();
        let media_subtype = media[slash + 1..].trim().to_string();
        if media_type.is_empty() || media_subtype.is_empty() {
            return Err(Error::header(HeaderField::ContentType, format!("empty type or subtype: {input:?}")));
        }
        Ok(ContentType { media_type, media_subtype, params_text })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.media_subtype)?;
        if let Some(params) = &self.params_text {
            write!(f, ";{params}")?;
        }
        Ok(())
    }
}

/// A singleton header whose value is kept as decoded, folded, trimmed
/// text with no further structure imposed (spec §3.4).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextHeaders {
    pub event: Option<String>,
    pub subject: Option<String>,
    pub supported: Option<String>,
    pub allow_events: Option<String>,
    pub refer_sub: Option<String>,
    pub referred_by: Option<String>,
    pub reason: Option<String>,
    pub resource_priority: Option<String>,
    pub subscription_state: Option<String>,
    pub geolocation_routing: Option<String>,
    pub geolocation_error: Option<String>,
    pub accept: Option<String>,
    pub allow: Option<String>,
}
