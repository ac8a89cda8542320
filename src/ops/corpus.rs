use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::model::tag::{Tag, TagLabel};

/// One row of a tag corpus CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CorpusRow {
    tag: String,
    /// Kept as text so a malformed count loses the count, not the tag
    #[serde(default)]
    times_used: Option<String>,
}

impl CorpusRow {
    fn into_tag(self) -> Option<Tag> {
        let label = TagLabel::new(&self.tag)?;
        let usage = self.times_used.and_then(|s| s.trim().parse().ok());
        Some(Tag::new(label, usage))
    }
}

/// An in-memory tag corpus searched by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    tags: Vec<Tag>,
    /// Lowercased labels, parallel to `tags`
    folded: Vec<String>,
}

impl Corpus {
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        let folded = tags.iter().map(|t| t.label.as_str().to_lowercase()).collect();
        Corpus { tags, folded }
    }

    /// Parse a CSV with a header row containing at least a `tag` column.
    ///
    /// Rows that fail to parse or carry a blank tag are skipped. A
    /// `times_used` that is not a number leaves the tag without a count.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::Reader::from_reader(reader);
        // Fail early on a missing header instead of skipping every row
        rdr.headers()?;
        let mut tags = Vec::new();
        let mut skipped = 0usize;
        for row in rdr.deserialize::<CorpusRow>() {
            match row {
                Ok(row) => match row.into_tag() {
                    Some(tag) => tags.push(tag),
                    None => skipped += 1,
                },
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "skipped unreadable corpus rows");
        }
        Ok(Corpus::from_tags(tags))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags whose label contains `query` (ignoring case), in corpus order,
    /// at most `limit` of them. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Tag> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.folded
            .iter()
            .zip(&self.tags)
            .filter(|(folded, _)| folded.contains(&needle))
            .map(|(_, tag)| tag.clone())
            .take(limit)
            .collect()
    }
}
