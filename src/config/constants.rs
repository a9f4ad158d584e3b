// Project-wide constants
//
// Defaults for every configurable value live here. Import via
// `use crate::config::constants::*;`.

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Root of the Gemini REST API
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on a single generate call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Background context file, relative to the working directory
pub const DEFAULT_BACKGROUND_FILE: &str = "background.txt";

/// Config file location under the home directory
pub const CONFIG_DIR_NAME: &str = ".tunechat";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Environment variables
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BACKGROUND_FILE_ENV: &str = "TUNECHAT_BACKGROUND_FILE";
