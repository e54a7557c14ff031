use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// Internal modules (private)
mod failure_log;
mod fetcher;
mod generator;
mod outcome;
mod renamer;
mod shortcut;
mod worker;

#[cfg(test)]
mod testing;

// Re-export public types
pub use failure_log::{FailureLog, DEFAULT_FAILURE_LOG};
pub use fetcher::{extract_title, HttpTitleFetcher, TitleFetcher};
pub use generator::{generate_filename, sanitize_filename, SHORTCUT_EXTENSION};
pub use outcome::{Failure, FileOutcome};
pub use renamer::{rename_shortcut, BACKUP_DIR_NAME};
pub use shortcut::{extract_url, ShortcutFile};
pub use worker::{spawn_batch, BatchHandle, CancelToken};

/// Configuration options for a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Scan nested folders instead of the top level only
    pub recurse_subdirectories: bool,
    /// Move each original into `UpRL-backup/` before writing the renamed copy
    pub backup_files: bool,
    /// Keep the operator's window above others; presentation only, ignored here
    pub always_on_top: bool,
    /// Compute and log new names without touching the filesystem
    pub dry_run: bool,
    /// Skip hidden files and directories (starting with .)
    pub skip_hidden: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            recurse_subdirectories: true,
            backup_files: false,
            always_on_top: false,
            dry_run: false,
            skip_hidden: false,
        }
    }
}

/// The directories an operator queued for processing, plus running counters
///
/// The processed count accumulates across runs until [`BatchJob::clear`].
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    directories: Vec<PathBuf>,
    config: BatchConfig,
    processed: usize,
}

impl BatchJob {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            directories: Vec::new(),
            config,
            processed: 0,
        }
    }

    /// Queues a directory; anything that is not an existing directory is ignored
    pub fn add_directory(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if path.is_dir() {
            self.directories.push(path);
            true
        } else {
            log::debug!("Ignoring non-directory input: {}", path.display());
            false
        }
    }

    /// Queues every directory among `paths`, returning how many were accepted
    pub fn add_paths<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut accepted = 0;
        for path in paths {
            if self.add_directory(path) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Files successfully processed since the job was created or cleared
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Empties the directory list and resets the counters
    pub fn clear(&mut self) {
        self.directories.clear();
        self.processed = 0;
    }
}

/// Whether a processor currently has a batch in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
}

/// A queued directory that could not be enumerated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDirectory {
    pub directory: PathBuf,
    pub message: String,
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Shortcut files found across all directories
    pub total: usize,
    /// Files renamed successfully in this run
    pub processed: usize,
    /// Files that failed in this run
    pub failed: usize,
    /// True if the run stopped early on request
    pub cancelled: bool,
    pub skipped_directories: Vec<SkippedDirectory>,
    pub outcomes: Vec<FileOutcome>,
}

/// Progress notifications emitted while a batch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Enumeration finished; `total` files will be processed
    Started { directories: usize, total: usize },
    DirectorySkipped(SkippedDirectory),
    /// One file finished; `processed` is the job's running success count
    FileProcessed {
        outcome: FileOutcome,
        processed: usize,
    },
    Finished(BatchSummary),
}

/// Runs batches of shortcut renames, one at a time
pub struct BatchProcessor {
    fetcher: Box<dyn TitleFetcher>,
    failure_log: FailureLog,
    busy: AtomicBool,
}

/// Clears the busy flag when a run ends, including on early return
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchProcessor {
    /// Create a processor with the given title source and failure log
    pub fn new(fetcher: Box<dyn TitleFetcher>, failure_log: FailureLog) -> Self {
        Self {
            fetcher,
            failure_log,
            busy: AtomicBool::new(false),
        }
    }

    /// Create a processor that fetches titles over HTTP
    pub fn with_http(failure_log: FailureLog) -> Result<Self> {
        Ok(Self::new(Box::new(HttpTitleFetcher::new()?), failure_log))
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    pub fn state(&self) -> BatchState {
        if self.busy.load(Ordering::SeqCst) {
            BatchState::Running
        } else {
            BatchState::Idle
        }
    }

    /// Processes every shortcut file in the job's directories
    ///
    /// Files are handled strictly one after another. A failing file is
    /// logged and recorded in the summary; it never stops the batch. The
    /// cancel token is checked between files. Fails only if another batch
    /// is already running on this processor.
    pub fn run<F>(
        &self,
        job: &mut BatchJob,
        cancel: &CancelToken,
        mut on_event: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(&BatchEvent),
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            anyhow::bail!("A batch is already running");
        }
        let _guard = BusyGuard(&self.busy);

        let config = job.config.clone();
        let mut summary = BatchSummary::default();

        if config.dry_run {
            log::info!("Running in DRY-RUN mode - no files will be renamed");
        }

        // Enumerate everything first, directories in queue order
        let mut files = Vec::new();
        for directory in &job.directories {
            match self.scan_directory(directory, &config) {
                Ok(found) => files.extend(found),
                Err(e) => {
                    log::warn!("Skipping directory {}: {:#}", directory.display(), e);
                    let skipped = SkippedDirectory {
                        directory: directory.clone(),
                        message: format!("{:#}", e),
                    };
                    on_event(&BatchEvent::DirectorySkipped(skipped.clone()));
                    summary.skipped_directories.push(skipped);
                }
            }
        }

        summary.total = files.len();
        log::info!("Processing {} shortcut files...", files.len());
        on_event(&BatchEvent::Started {
            directories: job.directories.len(),
            total: files.len(),
        });

        for file_path in files {
            if cancel.is_cancelled() {
                log::info!("Batch cancelled");
                summary.cancelled = true;
                break;
            }

            let outcome = self.process_file(&file_path, &config);

            match outcome.failure() {
                None => {
                    job.processed += 1;
                    summary.processed += 1;
                }
                Some(failure) => {
                    summary.failed += 1;
                    log::warn!("Failed to process {}: {}", file_path.display(), failure);
                    if let Err(e) = self.failure_log.append(&file_path, failure.message()) {
                        log::error!("{:#}", e);
                    }
                }
            }

            on_event(&BatchEvent::FileProcessed {
                outcome: outcome.clone(),
                processed: job.processed,
            });
            summary.outcomes.push(outcome);
        }

        log::info!(
            "Processing complete! {} of {} files renamed",
            summary.processed,
            summary.total
        );
        on_event(&BatchEvent::Finished(summary.clone()));

        Ok(summary)
    }

    /// Parses, fetches and renames a single shortcut file
    pub fn process_file(&self, file_path: &Path, config: &BatchConfig) -> FileOutcome {
        let failed = |failure: Failure| FileOutcome::Failed {
            path: file_path.to_path_buf(),
            failure,
        };

        let shortcut = match ShortcutFile::read(file_path) {
            Ok(shortcut) => shortcut,
            Err(e) => return failed(Failure::parse(&e)),
        };

        let url = match shortcut.url() {
            Some(url) => url,
            None => {
                return failed(Failure::Parse(format!(
                    "No URL= line found in {}",
                    file_path.display()
                )))
            }
        };

        let title = match self.fetcher.fetch_title(&url) {
            Ok(title) => title,
            Err(e) => return failed(Failure::fetch(&e)),
        };

        match renamer::rename_shortcut(&shortcut, &title, config.backup_files, config.dry_run) {
            Ok(target) => FileOutcome::Renamed {
                source: file_path.to_path_buf(),
                target,
                title,
            },
            Err(e) => failed(Failure::rename(&e)),
        }
    }

    // Private helper methods

    fn scan_directory(&self, directory: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        if !directory.is_dir() {
            anyhow::bail!("Not a directory: {}", directory.display());
        }

        log::info!("Scanning directory: {}", directory.display());

        let max_depth = if config.recurse_subdirectories {
            usize::MAX
        } else {
            1
        };

        let mut files = Vec::new();

        for entry in WalkDir::new(directory)
            .follow_links(false)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_str();
                if config.skip_hidden && name.map(|s| s.starts_with('.')).unwrap_or(false) {
                    return false;
                }
                // Never reprocess earlier backups
                !(e.file_type().is_dir() && name == Some(BACKUP_DIR_NAME))
            })
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_shortcut(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("Failed to enumerate {}", directory.display())));
                }
                Err(e) => {
                    log::warn!("Failed to access entry: {}", e);
                }
            }
        }

        log::info!("Found {} shortcut files in {}", files.len(), directory.display());
        Ok(files)
    }
}

/// True for files carrying the shortcut extension (any case)
fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SHORTCUT_EXTENSION))
        .unwrap_or(false)
}
