use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator;
use crate::shortcut::ShortcutFile;

/// Name of the subdirectory that receives original files before a rename
pub const BACKUP_DIR_NAME: &str = "UpRL-backup";

/// Writes a shortcut under the filename derived from `title`
///
/// With `backup` the original is first moved into `UpRL-backup/` next to it;
/// without it the original stays where it is and the new file is written
/// alongside. The new file always carries the original bytes unchanged.
/// Returns the path of the new file.
pub fn rename_shortcut(
    shortcut: &ShortcutFile,
    title: &str,
    backup: bool,
    dry_run: bool,
) -> Result<PathBuf> {
    let old_path = shortcut.path();
    let parent = old_path.parent().context("File has no parent directory")?;

    let new_filename = generator::generate_filename(title)?;
    let new_path = parent.join(&new_filename);

    // Check if destination holds something else (prevent overwrite)
    if new_path != old_path && new_path.exists() {
        let existing = fs::read(&new_path).with_context(|| {
            format!("Failed to inspect existing file {}", new_path.display())
        })?;
        if existing != shortcut.contents() {
            anyhow::bail!(
                "Destination file already exists: {}. Skipping to prevent data loss.",
                new_path.display()
            );
        }
    }

    // An earlier backup under the same name is never replaced
    let backup_path = if backup {
        let path = backup_path_for(old_path, parent)?;
        if path.exists() {
            anyhow::bail!(
                "Backup file already exists: {}. Skipping to prevent data loss.",
                path.display()
            );
        }
        Some(path)
    } else {
        None
    };

    if dry_run {
        info!("[DRY RUN] {} -> {}", old_path.display(), new_filename);
        return Ok(new_path);
    }

    if let Some(backup_path) = &backup_path {
        backup_file(old_path, backup_path)?;
    }

    fs::write(&new_path, shortcut.contents())
        .with_context(|| format!("Failed to write {}", new_path.display()))?;

    info!("Renamed: {} -> {}", old_path.display(), new_filename);

    Ok(new_path)
}

/// Location of `path` inside the backup directory of `parent`
fn backup_path_for(path: &Path, parent: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().context("File has no name")?;
    Ok(parent.join(BACKUP_DIR_NAME).join(file_name))
}

/// Moves a file to `backup_path`, creating the backup directory if needed
fn backup_file(path: &Path, backup_path: &Path) -> Result<()> {
    let backup_dir = backup_path.parent().context("Backup path has no parent")?;
    fs::create_dir_all(backup_dir).with_context(|| {
        format!("Failed to create backup directory {}", backup_dir.display())
    })?;

    fs::rename(path, backup_path).with_context(|| {
        format!(
            "Failed to move {} to {}",
            path.display(),
            backup_path.display()
        )
    })?;

    log::debug!("Backed up {} to {}", path.display(), backup_path.display());

    Ok(())
}
