//! Nine Morris AI - move search and the worker-thread coordinator
//!
//! This crate provides:
//! - Alpha-beta minimax over complete turns
//! - A coordinator that runs one search at a time off the main loop

pub mod search;
pub mod coordinator;

pub use search::{best_move, evaluate, legal_actions, MoveResult, SearchConfig, WIN_VALUE};
pub use coordinator::{SearchCoordinator, SearchError, SearchFn};
