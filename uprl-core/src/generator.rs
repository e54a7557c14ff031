use anyhow::Result;

/// Extension given to every generated shortcut filename
pub const SHORTCUT_EXTENSION: &str = "url";

/// Longest filename, in bytes, accepted by common filesystems
const MAX_FILENAME_BYTES: usize = 255;

/// Characters that are not allowed in a filename on the strictest supported
/// platform. Control characters are rejected as well.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Builds the new shortcut filename for a page title
///
/// Fails when the title is empty or whitespace only, since that would give
/// a degenerate `.url` name, or when the result exceeds 255 bytes.
pub fn generate_filename(title: &str) -> Result<String> {
    if title.trim().is_empty() {
        anyhow::bail!("Page title is empty; cannot build a filename from it");
    }

    let filename = format!("{}.{}", sanitize_filename(title), SHORTCUT_EXTENSION);
    if filename.len() > MAX_FILENAME_BYTES {
        anyhow::bail!(
            "Filename built from page title is too long ({} bytes, limit {})",
            filename.len(),
            MAX_FILENAME_BYTES
        );
    }

    Ok(filename)
}

/// Replaces every forbidden character with an underscore
///
/// One underscore per character, nothing else is altered, so the mapping is
/// deterministic and independent of the host platform.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || FORBIDDEN_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
