use crate::types::Record;

/// Why [`Record::parse`] rejected a text.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The text is not a JSON object at all.
    #[error("shape error: {reason}")]
    Shape { reason: String },

    /// The record chain nests deeper than [`MAX_DEPTH`](crate::types::MAX_DEPTH).
    #[error("record chain too deep: {depth} levels")]
    TooDeep { depth: usize },

    /// The object is malformed JSON or lacks a record field.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The error produced by [`Wrap::e`](crate::Wrap::e).
///
/// Its `Display` output is the JSON encoding of [`record`](Self::record), so
/// printing or logging it yields the full annotation tree.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{text}")]
pub struct WrapError {
    text: String,
    record: Record,
}

impl WrapError {
    pub(crate) fn new(text: String, record: Record) -> Self {
        Self { text, record }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl AsRef<str> for WrapError {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
