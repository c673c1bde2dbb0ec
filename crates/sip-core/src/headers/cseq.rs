use std::fmt;

use crate::error::{Error, HeaderField, Result};
use crate::headers::method::Method;

/// CSeq header: `<number> <method>` (spec §3.4).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CSeq {
    pub sequence: u32,
    pub method: Method,
}

impl CSeq {
    pub fn new(sequence: u32, method: Method) -> Self {
        CSeq { sequence, method }
    }

    pub fn parse(input: &str) -> Result<CSeq> {
        let mut parts = input.trim().splitn(2, char::is_whitespace);
        let seq_str = parts
            .next()
            .ok_or_else(|| Error::header(HeaderField::CSeq, "empty CSeq".into()))?;
        let method_str = parts
            .next()
            .ok_or_else(|| Error::header(HeaderField::CSeq, "CSeq missing method".into()))?
            .trim();
        let sequence = seq_str
            .parse::<u32>()
            .map_err(|_| Error::header(HeaderField::CSeq, format!("non-numeric CSeq: {seq_str}")))?;
        let method = Method::from_str_field(method_str)?;
        Ok(CSeq { sequence, method })
    }
}

impl Method {
    fn from_str_field(s: &str) -> Result<Method> {
        use std::str::FromStr;
        Method::from_str(s).map_err(|_| Error::header(HeaderField::CSeq, format!("invalid method: {s}")))
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sequence, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sequence_and_method() {
        let cseq = CSeq::parse("314159 INVITE").unwrap();
        assert_eq!(cseq.sequence, 314159);
        assert_eq!(cseq.method, Method::Invite);
    }

    #[test]
    fn non_numeric_sequence_fails() {
        assert!(CSeq::parse("abc INVITE").is_err());
    }
}
