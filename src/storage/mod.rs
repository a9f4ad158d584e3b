// Transcript storage for fine-tuning data collection
//
// Rated conversations are appended to a flat file, either as CSV rows or as
// records in a single JSON document. Records are never rewritten or removed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::conversation::Turn;
use crate::errors::StorageError;

pub mod csv_store;
pub mod json_store;

pub use csv_store::CsvTranscriptStore;
pub use json_store::JsonTranscriptStore;

/// A satisfaction rating between 1 and 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> Result<Self, StorageError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(StorageError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = StorageError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.0 as i32
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability set shared by every transcript backend
pub trait TranscriptStore {
    /// Append a single exchange (first user input, last model output)
    fn save_conversation(&self, input: &str, output: &str, rating: i32)
        -> Result<(), StorageError>;

    /// Append every turn of a conversation
    fn save_full_conversation(&self, turns: &[Turn], rating: i32) -> Result<(), StorageError>;

    /// Backing file
    fn path(&self) -> &Path;
}

/// On-disk format of the transcript file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Csv,
    Json,
}

impl StorageFormat {
    /// File name used when no path is configured
    pub fn default_path(&self) -> PathBuf {
        match self {
            StorageFormat::Csv => PathBuf::from("conversations.csv"),
            StorageFormat::Json => PathBuf::from("conversations.json"),
        }
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageFormat::Csv),
            "json" => Ok(StorageFormat::Json),
            other => Err(format!("unknown storage format '{}' (expected csv or json)", other)),
        }
    }
}

/// Which view of the session gets saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// First user message and last assistant message only
    #[default]
    Condensed,
    /// Every turn
    Full,
}

impl FromStr for SaveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "condensed" => Ok(SaveMode::Condensed),
            "full" => Ok(SaveMode::Full),
            other => Err(format!("unknown save mode '{}' (expected condensed or full)", other)),
        }
    }
}

/// Open the backend for `format`, creating its file if needed
pub fn open_store(
    format: StorageFormat,
    path: impl Into<PathBuf>,
) -> Result<Box<dyn TranscriptStore>, StorageError> {
    let store: Box<dyn TranscriptStore> = match format {
        StorageFormat::Csv => Box::new(CsvTranscriptStore::new(path)?),
        StorageFormat::Json => Box::new(JsonTranscriptStore::new(path)?),
    };
    Ok(store)
}
