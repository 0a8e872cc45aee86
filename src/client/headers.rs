//! Fixed, ordered header lists injected into outbound requests.

use crate::error::HeaderError;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::fmt;
use std::slice;

const APPLICATION_JSON: &str = "application/json";

/// A single `Name: value` header.
///
/// Name and value are validated when the entry is built, so applying it to a
/// request cannot fail. The name keeps the casing it was given for display;
/// HTTP/1 requests sent by [`HyperTransport`](crate::HyperTransport) carry it
/// in canonical title case (`Content-Type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    label: String,
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderEntry {
    /// Builds an entry from a header name and value.
    pub fn new(name: &str, value: &str) -> Result<Self, HeaderError> {
        Ok(Self {
            label: name.to_string(),
            name: HeaderName::from_bytes(name.as_bytes())?,
            value: HeaderValue::from_str(value)?,
        })
    }

    /// Builds an entry from a `Name: value` line.
    pub fn parse(line: &str) -> Result<Self, HeaderError> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HeaderError::Malformed(line.to_string()))?;
        Self::new(name.trim(), value.trim())
    }

    fn from_static(label: &'static str, name: HeaderName, value: &'static str) -> Self {
        Self {
            label: label.to_string(),
            name,
            value: HeaderValue::from_static(value),
        }
    }

    /// Name as given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl fmt::Display for HeaderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = String::from_utf8_lossy(self.value.as_bytes());
        write!(f, "{}: {}", self.label, value)
    }
}

/// Ordered list of headers set on every request a round tripper sends.
///
/// Read-only once built. Duplicate names are kept as separate entries; when
/// applied, each entry overwrites the previous one with the same name, so the
/// last one wins on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<HeaderEntry>,
}

impl HeaderSet {
    /// Creates a header set with `entries`, in order.
    pub fn new(entries: Vec<HeaderEntry>) -> Self {
        Self { entries }
    }

    /// The JSON exchange headers: `Content-Type` then `Accept`, both
    /// `application/json`.
    pub fn json() -> Self {
        Self::new(vec![
            HeaderEntry::from_static("Content-Type", CONTENT_TYPE, APPLICATION_JSON),
            HeaderEntry::from_static("Accept", ACCEPT, APPLICATION_JSON),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HeaderEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, HeaderEntry> {
        self.entries.iter()
    }

    /// Sets every entry on `headers`, in order, replacing any values already
    /// present under the same name.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for entry in &self.entries {
            headers.insert(entry.name.clone(), entry.value.clone());
        }
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        Self::json()
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a HeaderEntry;
    type IntoIter = slice::Iter<'a, HeaderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
