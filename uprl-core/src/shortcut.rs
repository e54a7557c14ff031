use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Line prefix that marks the target hyperlink, compared case-insensitively
const URL_KEY: &str = "url=";

/// An internet shortcut file as read from disk
///
/// The raw bytes are kept so the file can be written back verbatim under a
/// new name; parsing works on a lossy UTF-8 view of the same bytes.
#[derive(Debug, Clone)]
pub struct ShortcutFile {
    path: PathBuf,
    contents: Vec<u8>,
}

impl ShortcutFile {
    /// Reads a shortcut file into memory
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read(path)
            .with_context(|| format!("Failed to read shortcut file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original file content, byte for byte
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Text lines of the file (lossy for non UTF-8 input)
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.contents)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Target hyperlink of this shortcut, if it has one
    pub fn url(&self) -> Option<String> {
        extract_url(String::from_utf8_lossy(&self.contents).lines())
    }
}

/// Extracts the hyperlink from the lines of a shortcut file
///
/// Every line starting with `url=` (any case) overwrites the previous match,
/// so the last such line wins. The value is everything after the first `=`.
pub fn extract_url<'a, I>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = None;

    for line in lines {
        let is_url_line = line
            .get(..URL_KEY.len())
            .map(|prefix| prefix.eq_ignore_ascii_case(URL_KEY))
            .unwrap_or(false);

        if is_url_line {
            let value = line[URL_KEY.len()..].trim();
            url = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
    }

    url
}
