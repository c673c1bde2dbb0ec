//! Route and Record-Route headers: ordered sets of `<uri>;params`
//! entries (spec §3.4). Order is significant and preserved verbatim;
//! index 0 is the entry closest to the element that added it.

use std::fmt;

use crate::error::Result;
use crate::headers::contact::UriWithParams;

pub type RouteEntry = UriWithParams;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteSet {
    entries: Vec<RouteEntry>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_header_value(input: &str) -> Result<RouteSet> {
        Ok(RouteSet { entries: UriWithParams::parse_list(input)? })
    }

    pub fn push_front(&mut self, entry: RouteEntry) {
        self.entries.insert(0, entry);
    }

    pub fn push_back(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    pub fn top(&self) -> Option<&RouteEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Build the in-dialog Route set from a recorded Record-Route set,
    /// reversed (spec §4.8): the element closest to the far end becomes
    /// the element closest to the near end of the new request's path.
    pub fn reversed_from_record_route(record_route: &RouteSet) -> RouteSet {
        let mut entries: Vec<_> = record_route.entries.clone();
        entries.reverse();
        RouteSet { entries }
    }
}

impl fmt::Display for RouteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.entries.iter().map(|e| e.to_string()).collect();
        f.write_str(&rendered.join(","))
    }
}
