//! Operation result types.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// A single piece of returned content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Image {
        /// Base64-encoded image bytes.
        data: String,
        mime_type: String,
    },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Encode raw image bytes.
    pub fn image(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Image { .. } => None,
        }
    }
}

/// Result of a successful operation: an ordered list of content items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub content: Vec<ContentItem>,
}

impl ActionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
        }
    }

    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.content.push(item);
        self
    }

    pub fn push(&mut self, item: ContentItem) {
        self.content.push(item);
    }

    /// Image items only, in order.
    pub fn images(&self) -> impl Iterator<Item = &ContentItem> {
        self.content.iter().filter(|c| c.is_image())
    }

    /// Text items only, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(ContentItem::as_text)
    }

    pub fn has_image(&self) -> bool {
        self.content.iter().any(ContentItem::is_image)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
