use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

/// Error type for durable store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed store file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A durable key-value store holding string sequences.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError>;
    fn set(&self, key: &str, value: &[String]) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KvStore + ?Sized> KvStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[String]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// Store backed by a single JSON object file: `{ "<key>": ["a", "b"] }`.
///
/// Writes replace the whole file through a temp file in the same directory
/// so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

type Document = BTreeMap<String, Vec<String>>;

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Like `read_document`, but a malformed file is replaced instead of
    /// blocking every later write.
    fn read_document_for_write(&self) -> Result<Document, StoreError> {
        match self.read_document() {
            Err(StoreError::Malformed { .. }) => Ok(Document::new()),
            other => other,
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        let write_err = |e: std::io::Error| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        };
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;
        let content = serde_json::to_string_pretty(doc)
            .map_err(std::io::Error::from)
            .map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        let mut doc = self.read_document()?;
        Ok(doc.remove(key))
    }

    fn set(&self, key: &str, value: &[String]) -> Result<(), StoreError> {
        let mut doc = self.read_document_for_write()?;
        doc.insert(key.to_string(), value.to_vec());
        self.write_document(&doc)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let (mut doc, malformed) = match self.read_document() {
            Err(StoreError::Malformed { .. }) => (Document::new(), true),
            other => (other?, false),
        };
        if doc.remove(key).is_none() && !malformed {
            return Ok(());
        }
        if doc.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::WriteError {
                    path: self.path.clone(),
                    source: e,
                }),
            };
        }
        self.write_document(&doc)
    }
}

/// In-process store for tests and `--ephemeral` sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[String]) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
