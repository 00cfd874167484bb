//! Persistence gateway for the online leaderboard
//!
//! A [`Leaderboard`] is constructed once per process. Construction spawns
//! a background task that connects to PostgreSQL and runs the idempotent
//! schema setup; the handle transitions from `Connecting` to either
//! `Online` or, after exhausting retries, permanently `Offline`. Score
//! submission is fire-and-forget on background tasks so the render loop
//! never blocks on network I/O.

pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{ScoreRecord, ScoreStore, StoreError};

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::game::Difficulty;

/// Lifecycle phase of the gateway. Monotonic: `Connecting` moves to
/// exactly one of the terminal phases and stays there for the process
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Online,
    Offline,
}

const PHASE_CONNECTING: u8 = 0;
const PHASE_ONLINE: u8 = 1;
const PHASE_OFFLINE: u8 = 2;

struct Inner {
    store: ScoreStore,
    phase: AtomicU8,
}

/// Cloneable handle to the process-wide leaderboard state
#[derive(Clone)]
pub struct Leaderboard {
    inner: Arc<Inner>,
}

impl Leaderboard {
    /// Create the handle and spawn the one-shot connect-and-migrate task
    pub fn connect(config: StoreConfig) -> Self {
        let leaderboard = Self::with_phase(config, Phase::Connecting);
        let inner = Arc::clone(&leaderboard.inner);

        tokio::spawn(async move {
            match inner.store.connect_and_migrate().await {
                Ok(()) => {
                    inner.phase.store(PHASE_ONLINE, Ordering::Release);
                    info!("leaderboard online");
                }
                Err(err) => {
                    inner.phase.store(PHASE_OFFLINE, Ordering::Release);
                    warn!(error = %err, "leaderboard offline, no further retries");
                }
            }
        });

        leaderboard
    }

    pub(crate) fn with_phase(config: StoreConfig, phase: Phase) -> Self {
        let phase = match phase {
            Phase::Connecting => PHASE_CONNECTING,
            Phase::Online => PHASE_ONLINE,
            Phase::Offline => PHASE_OFFLINE,
        };
        Self {
            inner: Arc::new(Inner {
                store: ScoreStore::new(config),
                phase: AtomicU8::new(phase),
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.inner.phase.load(Ordering::Acquire) {
            PHASE_ONLINE => Phase::Online,
            PHASE_OFFLINE => Phase::Offline,
            _ => Phase::Connecting,
        }
    }

    pub fn is_online(&self) -> bool {
        self.phase() == Phase::Online
    }

    /// Submit a score on a fire-and-forget background task. Silent no-op
    /// unless online; a write that still fails after retries is logged
    /// and does not change the phase.
    ///
    /// Returns the task handle so a caller about to shut the runtime
    /// down can give the write a bounded window to land.
    pub fn submit(
        &self,
        username: &str,
        score: u32,
        difficulty: Difficulty,
    ) -> Option<JoinHandle<()>> {
        if !self.is_online() {
            debug!(username, score, "leaderboard not online, dropping score");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        let username = username.to_owned();
        Some(tokio::spawn(async move {
            if let Err(err) = inner
                .store
                .add_score(&username, score as i32, difficulty)
                .await
            {
                warn!(username, score, error = %err, "failed to save score");
            }
        }))
    }

    /// Ranked score list, highest first. Empty while connecting, offline,
    /// or when the read fails after retries. Callers wanting a responsive
    /// UI should run this on a background task and cache the result.
    pub async fn top_scores(&self, limit: i64) -> Vec<ScoreRecord> {
        if !self.is_online() {
            return Vec::new();
        }

        match self.inner.store.top_scores(limit).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "failed to fetch top scores");
                Vec::new()
            }
        }
    }
}
