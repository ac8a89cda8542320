use tracing::{debug, warn};

use crate::io::store::{KvStore, StoreError};
use crate::model::tag::TagLabel;

/// Key the picked-tag snapshot is stored under
pub const SNAPSHOT_KEY: &str = "saved_prompt";

/// Saves and restores the ordered label list under [`SNAPSHOT_KEY`].
pub struct Persistence {
    store: Box<dyn KvStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Persistence { store }
    }

    /// Overwrite the snapshot with `labels`.
    pub fn save(&self, labels: &[TagLabel]) -> Result<(), StoreError> {
        let value: Vec<String> = labels.iter().map(|l| l.as_str().to_string()).collect();
        self.store.set(SNAPSHOT_KEY, &value)?;
        debug!(count = value.len(), "saved snapshot");
        Ok(())
    }

    /// Read the snapshot. Missing, unreadable or malformed state yields an
    /// empty list. Blank entries are dropped; repeats are left for the
    /// collection to fold.
    pub fn load(&self) -> Vec<TagLabel> {
        match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(values)) => values.iter().filter_map(|v| TagLabel::new(v)).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable snapshot");
                Vec::new()
            }
        }
    }

    /// Remove the snapshot entirely.
    pub fn clear_persisted(&self) -> Result<(), StoreError> {
        self.store.delete(SNAPSHOT_KEY)
    }
}
