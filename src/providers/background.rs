// Static background context prepended to every prompt
//
// The background file is read once at startup. An absent file simply means
// no background; any other read failure is reported to the caller.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Load and trim the background file, or return "" if it does not exist.
pub fn load_background(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!("Loaded background context from {}", path.display());
            Ok(contents.trim().to_string())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No background file at {}", path.display());
            Ok(String::new())
        }
        Err(e) => Err(e)
            .with_context(|| format!("Failed to read background file {}", path.display())),
    }
}

/// Wrap `prompt` with the background context.
///
/// Produces "System: {background}\nUser: {prompt}" when there is a background,
/// otherwise the prompt unchanged.
pub fn with_background(background: &str, prompt: &str) -> String {
    if background.is_empty() {
        prompt.to_string()
    } else {
        format!("System: {}\nUser: {}", background, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_with_background_empty() {
        assert_eq!(with_background("", "hello"), "hello");
    }

    #[test]
    fn test_with_background_prefixes_prompt() {
        let result = with_background("You are terse.", "user: hi");
        assert_eq!(result, "System: You are terse.\nUser: user: hi");
    }

    #[test]
    fn test_load_background_missing_file() {
        let dir = TempDir::new().unwrap();
        let background = load_background(&dir.path().join("background.txt")).unwrap();
        assert_eq!(background, "");
    }

    #[test]
    fn test_load_background_trims() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n  Answer in French.  \n").unwrap();

        let background = load_background(file.path()).unwrap();
        assert_eq!(background, "Answer in French.");
    }

    #[test]
    fn test_load_background_directory_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_background(dir.path()).is_err());
    }
}
