use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::classify::{classify, PresentationVariant};

/// Fallback text for a plain row whose object has no content.
pub const MISSING_SUMMARY: &str = "(Item with missing summary)";
/// Fallback text for an activity without an action string.
pub const MISSING_ACTION: &str = "(Action string missing)";

// ============================================================================
// Error Types
// ============================================================================

/// Contract violations surfaced by the feed adapter.
///
/// None of these are recoverable by the adapter: an out-of-range position
/// means the caller ignored `row_count`, and an unparseable payload means the
/// local store handed over corrupt data.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Row position {position} out of range (row count {count})")]
    OutOfRange { position: usize, count: usize },

    #[error("Malformed activity payload at row {position}: {source}")]
    MalformedPayload {
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Activity payload at row {position} is not a JSON object")]
    NotAnObject { position: usize },
}

// ============================================================================
// Backing Rows
// ============================================================================

/// One record of the backing result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    /// Serialized activity document.
    pub payload: String,
    /// `object.id` extracted when the row was stored, if the store has it.
    pub object_key: Option<String>,
    pub replies: u32,
    pub likes: u32,
    pub shares: u32,
}

impl FeedRow {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            object_key: None,
            replies: 0,
            likes: 0,
            shares: 0,
        }
    }

    pub fn with_counts(mut self, replies: u32, likes: u32, shares: u32) -> Self {
        self.replies = replies;
        self.likes = likes;
        self.shares = shares;
        self
    }

    /// Attach the object id the store extracted for this row.
    pub fn with_object_key(mut self, key: Option<String>) -> Self {
        self.object_key = key.filter(|k| !k.is_empty());
        self
    }

    /// Nested `object.id` of this row, without building the full document.
    ///
    /// Uses the stored key when present. Returns `Ok(None)` when the object
    /// has no non-empty string id; `Err` only when the payload has to be
    /// parsed and does not parse.
    pub fn object_id(&self) -> Result<Option<String>, serde_json::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            object: Option<Value>,
        }

        if let Some(key) = &self.object_key {
            return Ok(Some(key.clone()));
        }
        let envelope: Envelope = serde_json::from_str(&self.payload)?;
        Ok(envelope
            .object
            .as_ref()
            .and_then(|object| object.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }
}

// ============================================================================
// View Models
// ============================================================================

/// Transient projection of one [`FeedRow`] for the presentation layer.
///
/// Counters are first-class fields rather than values spliced into the
/// payload document.
#[derive(Debug, Clone, PartialEq)]
pub struct RowViewModel {
    pub payload: Value,
    pub variant: PresentationVariant,
    pub replies: u32,
    pub likes: u32,
    pub shares: u32,
}

impl RowViewModel {
    /// Parse `row` (found at `position`) into a view model.
    pub fn from_row(row: &FeedRow, position: usize) -> Result<Self, RowError> {
        let payload: Value = serde_json::from_str(&row.payload)
            .map_err(|source| RowError::MalformedPayload { position, source })?;
        if !payload.is_object() {
            return Err(RowError::NotAnObject { position });
        }

        Ok(Self {
            variant: classify(&payload),
            payload,
            replies: row.replies,
            likes: row.likes,
            shares: row.shares,
        })
    }

    fn object(&self) -> Option<&Map<String, Value>> {
        self.payload.get("object").and_then(Value::as_object)
    }

    fn actor(&self) -> Option<&Map<String, Value>> {
        self.payload.get("actor").and_then(Value::as_object)
    }

    fn author(&self) -> Option<&Map<String, Value>> {
        self.object()?.get("author").and_then(Value::as_object)
    }

    /// Identifier of the nested object, if it has a non-empty one.
    pub fn object_id(&self) -> Option<&str> {
        self.object()?
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Raw (HTML) content of the nested object.
    pub fn object_content(&self) -> Option<&str> {
        self.object()?.get("content").and_then(Value::as_str)
    }

    /// Text shown for a plain row.
    pub fn summary(&self) -> &str {
        self.object_content().unwrap_or(MISSING_SUMMARY)
    }

    /// Activity-level action string ("alice posted a note").
    pub fn action_text(&self) -> &str {
        self.payload
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or(MISSING_ACTION)
    }

    /// Avatar and media URLs for the presentation layer's image loaders.
    pub fn object_image_url(&self) -> Option<&str> {
        image_url(self.object()?)
    }

    pub fn actor_image_url(&self) -> Option<&str> {
        image_url(self.actor()?)
    }

    pub fn author_image_url(&self) -> Option<&str> {
        image_url(self.author()?)
    }

    /// True when a note was posted by someone other than its author, so the
    /// row shows the origin avatar next to the actor's.
    pub fn shows_origin(&self) -> bool {
        if self.variant != PresentationVariant::Note {
            return false;
        }
        let actor_id = self.actor().and_then(|a| a.get("id")).and_then(Value::as_str);
        let author_id = self
            .author()
            .and_then(|a| a.get("id"))
            .and_then(Value::as_str);
        match (actor_id, author_id) {
            (Some(actor), Some(author)) => actor != author,
            _ => false,
        }
    }

    /// Only notes and images carry the replies/likes/shares bar.
    pub fn shows_counters(&self) -> bool {
        matches!(
            self.variant,
            PresentationVariant::Note | PresentationVariant::Image
        )
    }
}

/// Resolve an `image` member that is either a media link or a bare URL.
fn image_url(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("image")? {
        Value::String(url) => Some(url.as_str()),
        Value::Object(link) => link.get("url").and_then(Value::as_str),
        _ => None,
    }
}
