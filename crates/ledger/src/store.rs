//! Persistence backends for the score table

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context};

use crate::entry::ScoreEntry;

/// Blocking load/save of the whole table
///
/// Implementations are called from the ledger's blocking worker threads.
pub trait ScoreStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Vec<ScoreEntry>>;
    fn save(&self, entries: &[ScoreEntry]) -> anyhow::Result<()>;
}

/// Pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    /// A missing or blank file is an empty table
    fn load(&self) -> anyhow::Result<Vec<ScoreEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).with_context(|| format!("parse {}", self.path.display()))
    }

    fn save(&self, entries: &[ScoreEntry]) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(entries).context("serialize scores")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("replace {}", self.path.display()))
    }
}

/// In-memory table for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<ScoreEntry>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Vec<ScoreEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.clone())
    }

    fn save(&self, entries: &[ScoreEntry]) -> anyhow::Result<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        *stored = entries.to_vec();
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
