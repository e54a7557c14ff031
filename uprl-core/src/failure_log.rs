use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default failure log location, relative to the working directory
pub const DEFAULT_FAILURE_LOG: &str = "UpRL-ErrorLog.txt";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Append-only plain-text log of files that could not be processed
///
/// Each entry is written as `<newline>File: <path>, Message: <message>`.
/// The log is never rotated or truncated.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one failure record, creating the log if needed
    pub fn append(&self, file: &Path, message: &str) -> Result<()> {
        let mut log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open failure log {}", self.path.display()))?;

        write!(
            log_file,
            "{}File: {}, Message: {}",
            LINE_ENDING,
            file.display(),
            message
        )
        .with_context(|| format!("Failed to write failure log {}", self.path.display()))?;

        Ok(())
    }
}

impl Default for FailureLog {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_LOG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_append_format() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let log = FailureLog::new(temp_dir.path().join("errors.txt"));

        log.append(Path::new("/links/a.url"), "No URL= line found")?;
        log.append(Path::new("/links/b.url"), "timed out")?;

        let expected = format!(
            "{nl}File: /links/a.url, Message: No URL= line found{nl}File: /links/b.url, Message: timed out",
            nl = LINE_ENDING
        );
        assert_eq!(fs::read_to_string(log.path())?, expected);

        Ok(())
    }

    #[test]
    fn test_append_keeps_existing_content() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("errors.txt");
        fs::write(&path, "older entries")?;

        FailureLog::new(&path).append(Path::new("c.url"), "boom")?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("older entries"));
        assert!(content.ends_with("File: c.url, Message: boom"));

        Ok(())
    }

    #[test]
    fn test_default_path() {
        assert_eq!(FailureLog::default().path(), Path::new(DEFAULT_FAILURE_LOG));
    }
}
