//! Runs one search at a time on a worker thread
//!
//! The main loop calls [`SearchCoordinator::start`], then polls
//! [`SearchCoordinator::is_running`] once per frame and collects the move with
//! [`SearchCoordinator::result`] after the worker has finished. The worker is
//! the only writer of the result; it hands the result back through its join
//! handle and clears `running` with a release store as its last action, so an
//! acquire load of `false` means the result is ready.

use crate::search::{best_move, MoveResult, SearchConfig};
use morris_core::SearchRequest;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

/// Search routine run on the worker
pub type SearchFn = fn(&SearchRequest, &SearchConfig) -> MoveResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no search was started")]
    NotStarted,
    #[error("the search is still running")]
    StillRunning,
    #[error("the search worker panicked")]
    WorkerPanicked,
}

/// Clears the running flag when the worker exits, even by panic
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owner of the search worker thread
pub struct SearchCoordinator {
    config: SearchConfig,
    search: SearchFn,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<MoveResult>>,
    searches: u64,
}

impl SearchCoordinator {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_search(config, best_move)
    }

    /// Use a custom search routine
    pub fn with_search(config: SearchConfig, search: SearchFn) -> Self {
        Self {
            config,
            search,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            searches: 0,
        }
    }

    /// Spawn a worker searching `request`.
    ///
    /// # Panics
    /// If a search is already running.
    pub fn start(&mut self, request: SearchRequest) {
        assert!(!self.is_running(), "search started while another is running");

        // Reap a finished worker whose result was never collected
        if let Some(stale) = self.worker.take() {
            let _ = stale.join();
        }

        let config = self.config.with_seed(self.config.seed.wrapping_add(self.searches));
        self.searches += 1;
        let search = self.search;
        let guard = RunningGuard(Arc::clone(&self.running));
        self.running.store(true, Ordering::Release);

        tracing::debug!("starting {:?} search for {} at depth {}", request.kind, request.player, config.depth);
        self.worker = Some(std::thread::spawn(move || {
            let _guard = guard;
            search(&request, &config)
        }));
    }

    /// Whether the worker is still searching
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Collect the finished search without blocking
    pub fn result(&mut self) -> Result<MoveResult, SearchError> {
        if self.is_running() {
            return Err(SearchError::StillRunning);
        }
        self.join()
    }

    /// Wait for the worker and collect its result
    pub fn join(&mut self) -> Result<MoveResult, SearchError> {
        let worker = self.worker.take().ok_or(SearchError::NotStarted)?;
        worker.join().map_err(|_| {
            tracing::warn!("search worker panicked");
            SearchError::WorkerPanicked
        })
    }
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
