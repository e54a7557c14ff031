use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single shortcut could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Failure {
    /// No usable `URL=` line, or the file could not be read
    #[error("{0}")]
    Parse(String),
    /// Network, malformed URL, non-HTML response or missing title
    #[error("{0}")]
    Fetch(String),
    /// Backup or write of the renamed file failed
    #[error("{0}")]
    Rename(String),
}

impl Failure {
    /// Builds a failure from an error, keeping its full context chain
    pub fn parse(error: &anyhow::Error) -> Self {
        Self::Parse(format!("{:#}", error))
    }

    pub fn fetch(error: &anyhow::Error) -> Self {
        Self::Fetch(format!("{:#}", error))
    }

    pub fn rename(error: &anyhow::Error) -> Self {
        Self::Rename(format!("{:#}", error))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Parse(_) => "parse",
            Failure::Fetch(_) => "fetch",
            Failure::Rename(_) => "rename",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Failure::Parse(message) | Failure::Fetch(message) | Failure::Rename(message) => {
                message
            }
        }
    }
}

/// Result of processing one shortcut file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Renamed {
        source: PathBuf,
        target: PathBuf,
        title: String,
    },
    Failed {
        path: PathBuf,
        failure: Failure,
    },
}

impl FileOutcome {
    /// Path of the shortcut this outcome is about
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Renamed { source, .. } => source,
            FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Renamed { .. })
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            FileOutcome::Failed { failure, .. } => Some(failure),
            FileOutcome::Renamed { .. } => None,
        }
    }
}
