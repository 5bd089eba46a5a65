//! The shared score ledger
//!
//! Store I/O runs on a small private worker pool. The in-memory table sits
//! behind a read-write lock: readers share it, and a submission takes the
//! write side only to swap in the new table, never across file I/O.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::entry::{qualifies, rank, ScoreEntry};
use crate::store::{JsonFileStore, ScoreStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub path: PathBuf,
    /// Entries kept in the table
    pub capacity: usize,
    /// Worker threads, also the cap on concurrent store calls
    pub workers: usize,
    /// How long [`Ledger::submit`] waits before giving up
    pub submit_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/highscores.json"),
            capacity: 10,
            workers: 2,
            submit_timeout: Duration::from_secs(5),
        }
    }
}

impl LedgerConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_LEDGER_PATH`: score file (default `data/highscores.json`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let path = std::env::var("TETRIS_LEDGER_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.path);
        Self { path, ..defaults }
    }
}

struct Shared {
    store: Arc<dyn ScoreStore>,
    scores: RwLock<Vec<ScoreEntry>>,
    /// Serializes load-modify-save cycles between submissions
    submit_gate: Mutex<()>,
    capacity: usize,
}

impl Shared {
    async fn submit(self: Arc<Self>, entry: ScoreEntry) -> bool {
        if !qualifies(&self.scores.read().await, self.capacity, entry.score) {
            return false;
        }

        let _gate = self.submit_gate.lock().await;
        let fallback = self.scores.read().await.clone();
        let store = Arc::clone(&self.store);
        let capacity = self.capacity;
        let written = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<Vec<ScoreEntry>>> {
            let mut entries = store.load().unwrap_or_else(|e| {
                warn!("score table unreadable, merging into the loaded copy: {e:#}");
                fallback
            });
            let before = survivors(&entries, &entry);
            entries.push(entry.clone());
            let entries = rank(entries, capacity);
            if survivors(&entries, &entry) <= before {
                return Ok(None);
            }
            store.save(&entries)?;
            Ok(Some(entries))
        })
        .await;

        match written {
            Ok(Ok(Some(entries))) => {
                *self.scores.write().await = entries;
                true
            }
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                warn!("could not save score: {e:#}");
                false
            }
            Err(e) => {
                warn!("score worker failed: {e}");
                false
            }
        }
    }
}

/// Copies of `entry` present in `entries`
fn survivors(entries: &[ScoreEntry], entry: &ScoreEntry) -> usize {
    entries.iter().filter(|e| *e == entry).count()
}

fn load_or_empty(store: &dyn ScoreStore, capacity: usize) -> Vec<ScoreEntry> {
    match store.load() {
        Ok(entries) => rank(entries, capacity),
        Err(e) => {
            warn!("score table unreadable, treating as empty: {e:#}");
            Vec::new()
        }
    }
}

/// In-flight submission
///
/// Dropping the handle does not cancel the submission.
pub struct SubmitHandle {
    rt: Handle,
    join: JoinHandle<bool>,
}

impl SubmitHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block up to `limit` for the outcome; a timeout or worker failure reports false
    ///
    /// Must not be called from inside an async context.
    pub fn wait(self, limit: Duration) -> bool {
        let Self { rt, join } = self;
        match rt.block_on(async move { tokio::time::timeout(limit, join).await }) {
            Ok(Ok(accepted)) => accepted,
            Ok(Err(e)) => {
                warn!("score submission failed: {e}");
                false
            }
            Err(_) => {
                warn!("score submission timed out after {limit:?}");
                false
            }
        }
    }
}

/// Top-N score table shared between sessions
///
/// Every method is synchronous and meant for plain threads such as the game
/// loop; none may be called from inside an async context.
pub struct Ledger {
    rt: Runtime,
    shared: Arc<Shared>,
    submit_timeout: Duration,
}

impl Ledger {
    /// Ledger backed by the JSON file at `config.path`
    pub fn open(config: LedgerConfig) -> anyhow::Result<Self> {
        let store = Arc::new(JsonFileStore::new(config.path.clone()));
        Self::with_store(store, &config)
    }

    /// Ledger over any store; the table is loaded before this returns
    pub fn with_store(store: Arc<dyn ScoreStore>, config: &LedgerConfig) -> anyhow::Result<Self> {
        let workers = config.workers.max(1);
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .thread_name("ledger-worker")
            .enable_all()
            .build()
            .context("build ledger runtime")?;

        let capacity = config.capacity;
        let loader = Arc::clone(&store);
        let initial = rt
            .block_on(rt.spawn_blocking(move || load_or_empty(loader.as_ref(), capacity)))
            .context("initial score load")?;
        info!("score ledger loaded with {} entries", initial.len());

        Ok(Self {
            rt,
            shared: Arc::new(Shared {
                store,
                scores: RwLock::new(initial),
                submit_gate: Mutex::new(()),
                capacity,
            }),
            submit_timeout: config.submit_timeout,
        })
    }

    /// Start a submission on the worker pool
    ///
    /// Zero and non-qualifying scores resolve to false without touching the store.
    pub fn submit_async(&self, player_name: &str, score: u32) -> SubmitHandle {
        let entry = ScoreEntry::new(player_name, score);
        let shared = Arc::clone(&self.shared);
        let join = self.rt.spawn(shared.submit(entry));
        SubmitHandle {
            rt: self.rt.handle().clone(),
            join,
        }
    }

    /// Submit and wait up to the configured timeout
    pub fn submit(&self, player_name: &str, score: u32) -> bool {
        self.submit_async(player_name, score)
            .wait(self.submit_timeout)
    }

    /// Copy of the table, best first
    pub fn top_scores(&self) -> Vec<ScoreEntry> {
        self.shared.scores.blocking_read().clone()
    }

    pub fn highest_score(&self) -> Option<u32> {
        self.shared.scores.blocking_read().first().map(|e| e.score)
    }

    pub fn is_eligible(&self, score: u32) -> bool {
        qualifies(&self.shared.scores.blocking_read(), self.shared.capacity, score)
    }

    /// Reload the table from the store; returns the entry count
    pub fn refresh(&self) -> anyhow::Result<usize> {
        let store = Arc::clone(&self.shared.store);
        let fresh = self
            .rt
            .block_on(self.rt.spawn_blocking(move || store.load()))
            .context("score worker failed")??;
        let fresh = rank(fresh, self.shared.capacity);
        let count = fresh.len();
        *self.shared.scores.blocking_write() = fresh;
        Ok(count)
    }

    /// Empty both the store and the table
    pub fn clear(&self) -> anyhow::Result<()> {
        let store = Arc::clone(&self.shared.store);
        self.rt
            .block_on(self.rt.spawn_blocking(move || store.save(&[])))
            .context("score worker failed")??;
        self.shared.scores.blocking_write().clear();
        Ok(())
    }

    /// Stop the worker pool, waiting a bounded time for in-flight I/O
    pub fn shutdown(self) {
        self.rt.shutdown_timeout(Duration::from_secs(5));
    }
}
