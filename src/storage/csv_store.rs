// CSV transcript store
//
// Condensed saves write one (textInput, output, rating) row with newlines
// flattened so each record stays on one physical line. Full saves write one
// (role, text, rating) row per turn with the rating repeated on each row;
// nothing but row adjacency groups the turns of one conversation.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Rating, TranscriptStore};
use crate::conversation::Turn;
use crate::errors::StorageError;

/// Header written when the file is first created
pub const CSV_HEADER: [&str; 3] = ["textInput", "output", "rating"];

pub struct CsvTranscriptStore {
    path: PathBuf,
}

impl CsvTranscriptStore {
    /// Open the store, writing the header if the file does not exist yet
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
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        writer.write_record(CSV_HEADER).map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|source| self.io_error(source))
    }

    fn append_rows(&self, rows: &[[&str; 3]]) -> Result<(), StorageError> {
        self.ensure_exists()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for row in rows {
            writer.write_record(row).map_err(|e| self.csv_error(e))?;
        }

        writer.flush().map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

/// Replace line breaks with spaces
fn flatten_newlines(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

impl TranscriptStore for CsvTranscriptStore {
    fn save_conversation(
        &self,
        input: &str,
        output: &str,
        rating: i32,
    ) -> Result<(), StorageError> {
        let rating = Rating::new(rating)?.to_string();
        let input = flatten_newlines(input);
        let output = flatten_newlines(output);

        self.append_rows(&[[input.as_str(), output.as_str(), rating.as_str()]])?;

        info!("Conversation saved to {} with rating {}/5", self.path.display(), rating);
        Ok(())
    }

    fn save_full_conversation(&self, turns: &[Turn], rating: i32) -> Result<(), StorageError> {
        let rating = Rating::new(rating)?.to_string();

        let rows: Vec<[&str; 3]> = turns
            .iter()
            .map(|turn| [turn.role.as_str(), turn.text.as_str(), rating.as_str()])
            .collect();
        self.append_rows(&rows)?;

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
