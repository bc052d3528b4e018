//! Group-identity values and their wire format.
//!
//! A `PropertyValue` identifies the group a result belongs to: a single
//! atomic value, or an ordered composite when grouping on several criteria
//! at once. Values are totally ordered (composites lexicographically, a true
//! prefix sorting first) and serialize to a flat string that deserializes
//! back to an equal value given the same field context.
//!
//! ## Escaping
//!
//! Composite serializations join components with `,` and atomic payloads may
//! contain any character, so payloads are escaped before joining: `$` becomes
//! `$DL$`, `,` becomes `$CM$` and `:` becomes `$CL$`. Decoding reverses this
//! in a single pass, which makes the round trip exact even for payloads that
//! contain escape sequences themselves.

use std::cmp::Ordering;
use std::fmt;

use crate::error::SearchError;
use crate::pattern::QueryContext;

/// Identity of a result group.
///
/// `Multiple` components are atomic by construction; grouping on several
/// criteria produces one flat composite, never nested ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Numeric identity (e.g. a hit count or year).
    Int(i64),
    /// Plain string identity (e.g. a metadata field value).
    Str(String),
    /// A token value tied to an annotation context; needs the same field
    /// context to deserialize.
    Token { field: String, value: String },
    /// Ordered composite of atomic identities.
    Multiple(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Serializes to the compact wire form, e.g. `str:swift` or
    /// `int:3,cwt:contents:cat`.
    pub fn serialize(&self) -> String {
        match self {
            PropertyValue::Int(n) => format!("int:{}", n),
            PropertyValue::Str(s) => format!("str:{}", escape(s)),
            PropertyValue::Token { field, value } => {
                format!("cwt:{}:{}", escape(field), escape(value))
            }
            PropertyValue::Multiple(values) => values
                .iter()
                .map(PropertyValue::serialize)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Parses the wire form back into a value. The context supplies the
    /// field for token values serialized without one.
    pub fn deserialize(context: &QueryContext, serialized: &str) -> Result<Self, SearchError> {
        let parts: Vec<&str> = serialized.split(',').collect();
        if parts.len() > 1 {
            let values = parts
                .iter()
                .map(|part| Self::deserialize_atomic(context, part))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(PropertyValue::Multiple(values));
        }
        Self::deserialize_atomic(context, serialized)
    }

    /// Parses a wire form known to be composite, e.g. a grouping request
    /// parameter. Unlike [`PropertyValue::deserialize`], a single component
    /// still yields a one-element `Multiple`.
    pub fn deserialize_multiple(
        context: &QueryContext,
        serialized: &str,
    ) -> Result<Self, SearchError> {
        let values = serialized
            .split(',')
            .map(|part| Self::deserialize_atomic(context, part))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PropertyValue::Multiple(values))
    }

    fn deserialize_atomic(context: &QueryContext, part: &str) -> Result<Self, SearchError> {
        let malformed =
            || SearchError::InvalidQuery(format!("malformed group identity: {:?}", part));
        let (tag, payload) = part.split_once(':').ok_or_else(malformed)?;
        match tag {
            "int" => payload
                .parse::<i64>()
                .map(PropertyValue::Int)
                .map_err(|_| malformed()),
            "str" => Ok(PropertyValue::Str(unescape(payload))),
            "cwt" => match payload.split_once(':') {
                Some((field, value)) => Ok(PropertyValue::Token {
                    field: unescape(field),
                    value: unescape(value),
                }),
                // No explicit field: take it from the context.
                None => Ok(PropertyValue::Token {
                    field: context.field.clone(),
                    value: unescape(payload),
                }),
            },
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(n) => write!(f, "{}", n),
            PropertyValue::Str(s) => f.write_str(s),
            PropertyValue::Token { value, .. } => f.write_str(value),
            PropertyValue::Multiple(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" / ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}

impl Ord for PropertyValue {
    /// Total order used for explicit sorting of groups.
    ///
    /// Same-variant atomic values compare by value (strings
    /// case-insensitively, falling back to case-sensitive to stay consistent
    /// with equality); different variants compare by a fixed rank.
    /// Composites compare element by element; the first difference decides,
    /// and a strict prefix sorts before the longer composite.
    fn cmp(&self, other: &Self) -> Ordering {
        use PropertyValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Str(a), Str(b)) => compare_strings(a, b),
            (
                Token {
                    field: fa,
                    value: va,
                },
                Token {
                    field: fb,
                    value: vb,
                },
            ) => compare_strings(fa, fb).then_with(|| compare_strings(va, vb)),
            (Multiple(a), Multiple(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let cmp = x.cmp(y);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn rank(value: &PropertyValue) -> u8 {
    match value {
        PropertyValue::Int(_) => 0,
        PropertyValue::Str(_) => 1,
        PropertyValue::Token { .. } => 2,
        PropertyValue::Multiple(_) => 3,
    }
}

fn compare_strings(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn escape(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    for c in payload.chars() {
        match c {
            '$' => out.push_str("$DL$"),
            ',' => out.push_str("$CM$"),
            ':' => out.push_str("$CL$"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(payload: &str) -> String {
    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 3 < bytes.len() && bytes[i + 3] == b'$' {
            let replacement = match &payload[i + 1..i + 3] {
                "DL" => Some('$'),
                "CM" => Some(','),
                "CL" => Some(':'),
                _ => None,
            };
            if let Some(c) = replacement {
                out.push(c);
                i += 4;
                continue;
            }
        }
        // Everything outside escape sequences is plain ASCII-or-UTF8 text;
        // copy the full character.
        let c = payload[i..].chars().next().unwrap();
        out.push(c);
        i += c.len_utf8();
    }
    out
}
