//! Advisor client - non-blocking TCP exchanges on a private runtime
//!
//! The game loop is synchronous and must never wait on the network. Each
//! exchange runs as a task on a runtime owned by the client; the loop polls
//! [`MoveAdvisor::advise`] once per tick with the current request and gets a
//! move back once the matching exchange has completed.

use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::protocol::{encode_request, parse_move, AdvisorMove, AdvisorRequest};

/// Source of externally proposed moves
pub trait MoveAdvisor: Send {
    /// Poll for a move answering `request`
    ///
    /// Returns `None` while the answer is outstanding or the advisor is down.
    fn advise(&mut self, request: &AdvisorRequest) -> Option<AdvisorMove>;

    /// Whether the last completed exchange succeeded
    fn is_available(&self) -> bool;

    /// Forget outstanding work and connection state
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Minimum gap between attempts while unavailable
    pub retry_delay: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl AdvisorConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_ADVISOR_HOST` (default `localhost`)
    /// - `TETRIS_ADVISOR_PORT` (default `3000`)
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TETRIS_ADVISOR_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_ADVISOR_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host,
            port,
            ..defaults
        }
    }

    /// `TETRIS_ADVISOR_DISABLED` set to `1` or `true`
    pub fn is_disabled() -> bool {
        std::env::var("TETRIS_ADVISOR_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One request/response exchange on a fresh connection
pub async fn exchange(config: &AdvisorConfig, request: &AdvisorRequest) -> anyhow::Result<AdvisorMove> {
    let addr = config.address();
    let stream = timeout(config.connect_timeout, TcpStream::connect(&addr))
        .await
        .with_context(|| format!("connect to {addr} timed out"))?
        .with_context(|| format!("connect to {addr}"))?;

    let (reader, mut writer) = stream.into_split();
    let line = encode_request(request)?;
    writer
        .write_all(line.as_bytes())
        .await
        .context("send advisor request")?;
    writer.flush().await.context("flush advisor request")?;

    let mut reader = BufReader::new(reader);
    let mut response = String::new();
    timeout(config.read_timeout, reader.read_line(&mut response))
        .await
        .context("advisor response timed out")?
        .context("read advisor response")?;

    parse_move(&response)
}

struct Pending {
    request: AdvisorRequest,
    task: JoinHandle<anyhow::Result<AdvisorMove>>,
}

/// TCP advisor client; starts out unavailable
pub struct TcpAdvisor {
    rt: Runtime,
    config: AdvisorConfig,
    pending: Option<Pending>,
    available: bool,
    last_attempt: Option<Instant>,
}

impl TcpAdvisor {
    pub fn new(config: AdvisorConfig) -> anyhow::Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("advisor")
            .enable_all()
            .build()
            .context("build advisor runtime")?;
        Ok(Self {
            rt,
            config,
            pending: None,
            available: false,
            last_attempt: None,
        })
    }

    /// Client configured from the environment, or `None` when disabled
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        if AdvisorConfig::is_disabled() {
            return Ok(None);
        }
        Self::new(AdvisorConfig::from_env()).map(Some)
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn set_available(&mut self, available: bool) {
        if available != self.available {
            if available {
                info!("advisor at {} available, resuming control", self.config.address());
            } else {
                info!("advisor at {} unavailable, board frozen", self.config.address());
            }
        }
        self.available = available;
    }

    fn start(&mut self, request: &AdvisorRequest) {
        self.last_attempt = Some(Instant::now());
        let config = self.config.clone();
        let owned = request.clone();
        let task = self.rt.spawn(async move { exchange(&config, &owned).await });
        self.pending = Some(Pending {
            request: request.clone(),
            task,
        });
    }

    fn collect(&mut self) -> Option<AdvisorMove> {
        let pending = self.pending.take()?;
        if !pending.task.is_finished() {
            self.pending = Some(pending);
            return None;
        }
        match self.rt.block_on(pending.task) {
            Ok(Ok(mv)) => {
                debug!("advisor move: x={} rotate={}", mv.op_x, mv.op_rotate);
                self.set_available(true);
                Some(mv)
            }
            Ok(Err(e)) => {
                warn!("advisor exchange failed: {e:#}");
                self.set_available(false);
                None
            }
            Err(e) => {
                warn!("advisor task failed: {e}");
                self.set_available(false);
                None
            }
        }
    }

    fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}

impl MoveAdvisor for TcpAdvisor {
    fn advise(&mut self, request: &AdvisorRequest) -> Option<AdvisorMove> {
        if matches!(&self.pending, Some(p) if p.request != *request) {
            debug!("board changed, dropping outstanding advisor request");
            self.abort_pending();
        }
        if self.pending.is_some() {
            return self.collect();
        }
        if !self.available {
            if let Some(at) = self.last_attempt {
                if at.elapsed() < self.config.retry_delay {
                    return None;
                }
            }
        }
        self.start(request);
        None
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn reset(&mut self) {
        self.abort_pending();
        self.available = false;
        self.last_attempt = None;
    }
}

impl Drop for TcpAdvisor {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
