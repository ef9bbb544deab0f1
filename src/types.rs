use std::fmt;

use serde::de::{self, MapAccess, Visitor, value::MapAccessDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Deepest record chain [`Record::parse`] accepts.
///
/// [`Wrap::e`](crate::Wrap::e) nests every chain up to this depth; wrapping a
/// chain already deeper keeps it as raw text.
pub const MAX_DEPTH: usize = 256;

/// One annotation as it appears on the wire.
///
/// Field order is part of the format:
/// `{"fn_name": .., "args": [..], "msg": .., "inner": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Qualified name of the function that produced the annotation.
    pub fn_name: String,
    /// Captured arguments, each already rendered to text.
    pub args: Vec<String>,
    /// Message parts joined with single spaces.
    pub msg: String,
    /// The wrapped error: a nested record when it was itself an annotation.
    pub inner: Inner,
}

/// The cause carried by a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Inner {
    Text(String),
    Record(Box<Record>),
}

impl Record {
    /// Parse text previously produced by [`Wrap::e`](crate::Wrap::e).
    ///
    /// All four fields are required; unknown fields are ignored.
    ///
    /// Fails with [`Error::Shape`] when `text` is not a JSON object,
    /// [`Error::TooDeep`] when the chain exceeds [`MAX_DEPTH`], and
    /// [`Error::Json`] when the object is malformed or not record-shaped.
    pub fn parse(text: &str) -> Result<Self, Error> {
        if !text.trim_start().starts_with('{') {
            return Err(Error::Shape {
                reason: "not a JSON object".into(),
            });
        }
        // Each record nests one object, and its `args` array one level more.
        let depth = nesting_depth(text).saturating_sub(1);
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep { depth });
        }

        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let record = Record::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(record)
    }

    /// Number of records in the chain, counting `self`.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Inner::Record(next) = &current.inner {
            depth += 1;
            current = next;
        }
        depth
    }

    /// Raw text at the bottom of the chain.
    pub fn root_cause(&self) -> &str {
        let mut current = self;
        loop {
            match &current.inner {
                Inner::Text(text) => return text,
                Inner::Record(next) => current = next,
            }
        }
    }

    /// Iterate the chain from the outermost record inwards.
    pub fn chain(&self) -> impl Iterator<Item = &Record> {
        std::iter::successors(Some(self), |r| match &r.inner {
            Inner::Record(next) => Some(next.as_ref()),
            Inner::Text(_) => None,
        })
    }
}

impl<'de> Deserialize<'de> for Inner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InnerVisitor;

        impl<'de> Visitor<'de> for InnerVisitor {
            type Value = Inner;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or a nested record")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Inner, E> {
                Ok(Inner::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Inner, E> {
                Ok(Inner::Text(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Inner, A::Error> {
                let record = Record::deserialize(MapAccessDeserializer::new(map))?;
                Ok(Inner::Record(Box::new(record)))
            }
        }

        deserializer.deserialize_any(InnerVisitor)
    }
}

/// Maximum bracket nesting in `text`, ignoring brackets inside strings.
fn nesting_depth(text: &str) -> usize {
    let (mut depth, mut max) = (0_usize, 0_usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

impl Inner {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Text(_) => None,
        }
    }
}
