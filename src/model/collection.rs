use indexmap::IndexSet;

use super::tag::TagLabel;

/// Default separator for the exported prompt string
pub const DEFAULT_SEPARATOR: &str = ", ";

/// Identifies an entry to relocate: by its label or by its current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRef<'a> {
    Label(&'a str),
    Position(usize),
}

/// The ordered, duplicate-free list of picked tags.
///
/// Every mutator returns whether the sequence actually changed, so the owner
/// can persist and re-derive the export string only on real mutations.
/// Invalid requests (blank label, duplicate add, unknown label, out-of-range
/// source) are ignored and return `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCollection {
    tags: IndexSet<TagLabel>,
}

impl TagCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection from stored labels, dropping repeats.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = TagLabel>,
    {
        let mut collection = Self::new();
        for label in labels {
            collection.insert(label);
        }
        collection
    }

    /// Append `text` as a label unless it is blank or already present.
    pub fn add(&mut self, text: &str) -> bool {
        match TagLabel::new(text) {
            Some(label) => self.insert(label),
            None => false,
        }
    }

    /// Append an already-validated label unless it is already present.
    pub fn insert(&mut self, label: TagLabel) -> bool {
        self.tags.insert(label)
    }

    /// Remove one label, keeping the order of the rest.
    pub fn remove(&mut self, label: &str) -> bool {
        self.tags.shift_remove(label)
    }

    /// Relocate an existing entry to `target`, shifting the entries between.
    ///
    /// `target` is clamped into `[0, len)`.
    pub fn move_tag(&mut self, which: TagRef<'_>, target: usize) -> bool {
        let from = match which {
            TagRef::Label(label) => match self.tags.get_index_of(label) {
                Some(i) => i,
                None => return false,
            },
            TagRef::Position(i) if i < self.tags.len() => i,
            TagRef::Position(_) => return false,
        };
        let to = target.min(self.tags.len() - 1);
        if from == to {
            return false;
        }
        self.tags.move_index(from, to);
        true
    }

    /// Empty the sequence. Returns false if it was already empty.
    pub fn clear(&mut self) -> bool {
        if self.tags.is_empty() {
            return false;
        }
        self.tags.clear();
        true
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.tags.contains(label)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.tags.get_index_of(label)
    }

    pub fn get(&self, index: usize) -> Option<&TagLabel> {
        self.tags.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagLabel> {
        self.tags.iter()
    }

    /// Owned copy of the current order (for snapshots and previews)
    pub fn labels(&self) -> Vec<TagLabel> {
        self.tags.iter().cloned().collect()
    }

    /// Join the labels in order with `separator`.
    pub fn to_delimited_string(&self, separator: &str) -> String {
        self.tags
            .iter()
            .map(TagLabel::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}
