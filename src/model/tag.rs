use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantic identity of a tag, e.g. `1girl` or `blue_eyes`.
///
/// Labels are compared exactly (case-sensitive). A label is never empty and
/// never carries leading or trailing whitespace; [`TagLabel::new`] enforces
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagLabel(String);

impl TagLabel {
    /// Build a label from user or corpus text. Returns `None` for blank input.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(TagLabel(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TagLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagLabel::new(&value).ok_or_else(|| "tag label must not be blank".to_string())
    }
}

impl From<TagLabel> for String {
    fn from(label: TagLabel) -> Self {
        label.0
    }
}

/// A search candidate: a label plus display-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub label: TagLabel,
    /// How many posts use this tag, when the search endpoint reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
}

impl Tag {
    pub fn new(label: TagLabel, usage_count: Option<u64>) -> Self {
        Tag { label, usage_count }
    }

    /// Display text for the usage column, e.g. `1234 uses`
    pub fn usage_text(&self) -> Option<String> {
        self.usage_count.map(|n| format!("{} uses", n))
    }
}
