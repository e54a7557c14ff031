//! Shared fixtures for the unit tests

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;

use crate::TitleFetcher;

/// Answers from a fixed URL -> title table; unknown URLs fail like a
/// network error would
pub struct StubFetcher {
    titles: HashMap<String, String>,
}

impl StubFetcher {
    pub fn new(titles: &[(&str, &str)]) -> Self {
        Self {
            titles: titles
                .iter()
                .map(|(url, title)| (url.to_string(), title.to_string()))
                .collect(),
        }
    }
}

impl TitleFetcher for StubFetcher {
    fn fetch_title(&self, url: &str) -> Result<String> {
        self.titles
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("simulated network error for {}", url))
    }
}

/// Signals each fetch on `started` and then blocks until `release` fires
pub struct GatedFetcher {
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedFetcher {
    pub fn new(started: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            started: Mutex::new(started),
            release: Mutex::new(release),
        }
    }
}

impl TitleFetcher for GatedFetcher {
    fn fetch_title(&self, url: &str) -> Result<String> {
        self.started.lock().unwrap().send(())?;
        self.release.lock().unwrap().recv()?;
        Ok(format!("Title of {}", url.trim_start_matches("http://")))
    }
}

/// Writes a minimal shortcut file and returns its content
pub fn write_shortcut(dir: &Path, name: &str, url: &str) -> Result<String> {
    let content = format!("[InternetShortcut]\r\nURL={}\r\n", url);
    fs::write(dir.join(name), &content)?;
    Ok(content)
}
