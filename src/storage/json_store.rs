// JSON transcript store
//
// The file holds one document, {"conversations": [...]}. Every save reads the
// whole document, appends a record and writes it back through a sibling
// temp file that is renamed over the original.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Rating, TranscriptStore};
use crate::conversation::Turn;
use crate::errors::StorageError;

/// One rated conversation as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub messages: Vec<Turn>,
    pub rating: Rating,
}

/// Root of the JSON transcript file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptFile {
    #[serde(default)]
    pub conversations: Vec<TranscriptRecord>,
}

pub struct JsonTranscriptStore {
    path: PathBuf,
}

impl JsonTranscriptStore {
    /// Open the store, writing an empty document if the file does not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self { path: path.into() };
        store.ensure_exists()?;
        Ok(store)
    }

    fn ensure_exists(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        debug!("Creating transcript file {}", self.path.display());
        self.write(&TranscriptFile::default())
    }

    /// Read every stored conversation
    pub fn load(&self) -> Result<TranscriptFile, StorageError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&contents).map_err(|source| self.json_error(source))
    }

    /// Replace the document atomically: temp file, then rename
    fn write(&self, file: &TranscriptFile) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(file).map_err(|source| self.json_error(source))?;

        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, json).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn append(&self, record: TranscriptRecord) -> Result<(), StorageError> {
        self.ensure_exists()?;

        let mut file = self.load()?;
        file.conversations.push(record);
        self.write(&file)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl TranscriptStore for JsonTranscriptStore {
    fn save_conversation(
        &self,
        input: &str,
        output: &str,
        rating: i32,
    ) -> Result<(), StorageError> {
        let rating = Rating::new(rating)?;

        self.append(TranscriptRecord {
            messages: vec![Turn::user(input), Turn::assistant(output)],
            rating,
        })?;

        info!("Conversation saved to {} with rating {}/5", self.path.display(), rating);
        Ok(())
    }

    fn save_full_conversation(&self, turns: &[Turn], rating: i32) -> Result<(), StorageError> {
        let rating = Rating::new(rating)?;

        self.append(TranscriptRecord {
            messages: turns.to_vec(),
            rating,
        })?;

        info!(
            "Full conversation ({} turns) saved to {} with rating {}/5",
            turns.len(),
            self.path.display(),
            rating
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
