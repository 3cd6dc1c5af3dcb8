//! Resource paths
//!
//! A [`ResourcePath`] addresses one configuration node on the device, e.g.
//! `/network-instance[name="blue"]/protocols/bgp/group[group-name="spine"]`.
//!
//! Paths are opaque identifiers: equality and hashing are structural, and
//! the wire form is produced in exactly one place ([`fmt::Display`]).
//! Key values are rendered by kind: quoted strings get double quotes, bare
//! tokens and numbers do not. No escaping is performed, so key values must
//! not contain `]` or `"`.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Value of a list-key predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    /// Rendered as `"value"`.
    Quoted(String),
    /// Rendered verbatim, for enumeration-like keys such as `ipv4-unicast`.
    Bare(String),
    /// Rendered as a decimal integer.
    Number(u64),
}

impl KeyValue {
    /// An unquoted token.
    pub fn bare(value: impl Into<String>) -> Self {
        Self::Bare(value.into())
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Quoted(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Quoted(value)
    }
}

impl From<&String> for KeyValue {
    fn from(value: &String) -> Self {
        Self::Quoted(value.clone())
    }
}

impl From<u16> for KeyValue {
    fn from(value: u16) -> Self {
        Self::Number(u64::from(value))
    }
}

impl From<u32> for KeyValue {
    fn from(value: u32) -> Self {
        Self::Number(u64::from(value))
    }
}

impl From<u64> for KeyValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quoted(s) => write!(f, "\"{}\"", s),
            Self::Bare(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One `name=value` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub name: String,
    pub value: KeyValue,
}

/// A path segment: a node name plus zero or more key predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    pub name: String,
    pub keys: Vec<Key>,
}

impl Segment {
    /// A segment without predicates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for key in &self.keys {
            write!(f, "[{}={}]", key.name, key.value)?;
        }
        Ok(())
    }
}

/// Hierarchical, key-qualified address of a configuration node.
///
/// # Example
///
/// ```
/// use declarative::{KeyValue, ResourcePath};
///
/// let path = ResourcePath::new("network-instance")
///     .with_key("name", "default")
///     .child("protocols")
///     .child("bgp")
///     .child("afi-safi")
///     .with_key("afi-safi-name", KeyValue::bare("ipv4-unicast"));
///
/// assert_eq!(
///     path.to_string(),
///     "/network-instance[name=\"default\"]/protocols/bgp/afi-safi[afi-safi-name=ipv4-unicast]"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePath {
    segments: Vec<Segment>,
}

impl ResourcePath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-segment path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(name)],
        }
    }

    /// Append a segment.
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::new(name));
        self
    }

    /// Add a key predicate to the last segment.
    ///
    /// Has no effect on the root path.
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.keys.push(Key {
                name: name.into(),
                value: value.into(),
            });
        }
        self
    }

    /// A copy of this path with one more segment.
    pub fn join(&self, name: impl Into<String>) -> Self {
        self.clone().child(name)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The containing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Whether `self` equals `other` or contains it.
    pub fn contains(&self, other: &ResourcePath) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Whether `self` strictly contains `other`.
    pub fn is_ancestor_of(&self, other: &ResourcePath) -> bool {
        other.segments.len() > self.segments.len() && self.contains(other)
    }

    /// Parse the wire form.
    ///
    /// Quoted values become [`KeyValue::Quoted`], all-digit bare values
    /// become [`KeyValue::Number`], other bare values [`KeyValue::Bare`].
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let body = input
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must start with '/'"))?;
        if body.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for raw in split_segments(body).map_err(|reason| invalid(reason))? {
            segments.push(parse_segment(raw).map_err(|reason| invalid(reason))?);
        }
        Ok(Self { segments })
    }
}

/// Split on `/` outside of `[...]` predicates.
fn split_segments(body: &str) -> std::result::Result<Vec<&str>, &'static str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '"' if depth > 0 => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => {
                depth = depth.checked_sub(1).ok_or("unbalanced ']'")?;
            }
            '/' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || in_quotes {
        return Err("unterminated key predicate");
    }
    parts.push(&body[start..]);

    if parts.iter().any(|p| p.is_empty()) {
        return Err("empty path segment");
    }
    Ok(parts)
}

fn parse_segment(raw: &str) -> std::result::Result<Segment, &'static str> {
    let (name, mut rest) = match raw.find('[') {
        Some(i) => (&raw[..i], &raw[i..]),
        None => (raw, ""),
    };
    if name.is_empty() {
        return Err("segment has no name");
    }

    let mut segment = Segment::new(name);
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[').ok_or("expected '['")?;
        let eq = inner.find('=').ok_or("key predicate without '='")?;
        let key_name = &inner[..eq];
        if key_name.is_empty() {
            return Err("key predicate without a name");
        }
        let after_eq = &inner[eq + 1..];

        let (value, remainder) = if let Some(quoted) = after_eq.strip_prefix('"') {
            let close = quoted.find('"').ok_or("unterminated quoted key value")?;
            let tail = quoted[close + 1..]
                .strip_prefix(']')
                .ok_or("expected ']' after quoted key value")?;
            (KeyValue::Quoted(quoted[..close].to_string()), tail)
        } else {
            let close = after_eq.find(']').ok_or("expected ']'")?;
            let token = &after_eq[..close];
            let value = match token.parse::<u64>() {
                Ok(n) if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
                    KeyValue::Number(n)
                }
                _ => KeyValue::Bare(token.to_string()),
            };
            (value, &after_eq[close + 1..])
        };

        segment.keys.push(Key {
            name: key_name.to_string(),
            value,
        });
        rest = remainder;
    }
    Ok(segment)
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ResourcePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
