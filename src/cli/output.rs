use serde::Serialize;

use crate::model::collection::TagCollection;
use crate::model::tag::Tag;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TagJson {
    pub position: usize,
    pub label: String,
}

#[derive(Serialize)]
pub struct CandidateJson {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
}

pub fn collection_to_json(collection: &TagCollection) -> Vec<TagJson> {
    collection
        .iter()
        .enumerate()
        .map(|(position, label)| TagJson {
            position,
            label: label.as_str().to_string(),
        })
        .collect()
}

pub fn candidate_to_json(tag: &Tag) -> CandidateJson {
    CandidateJson {
        label: tag.label.as_str().to_string(),
        usage_count: tag.usage_count,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One candidate per line: the label, then the usage count when known
pub fn format_candidate_line(tag: &Tag) -> String {
    match tag.usage_text() {
        Some(usage) => format!("{}\t{}", tag.label, usage),
        None => tag.label.to_string(),
    }
}
