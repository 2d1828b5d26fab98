//! # Curation Module
//!
//! The three steps of a run, each working against any
//! [`LibraryService`](crate::spotify::LibraryService):
//!
//! - [`fetch`] - Paginated saved-track retrieval with bounded retry
//! - [`tally`] - Per-artist and per-album counts and threshold selection
//! - [`update`] - Batched follow/save calls with per-batch outcomes

pub mod fetch;
pub mod tally;
pub mod update;

pub use fetch::{PAGE_SIZE, PROGRESS_INTERVAL, RetryPolicy, crosses_progress_mark, fetch_all_saved_tracks};
pub use tally::{LibraryTally, Selected, Selection, Tally, aggregate, tally};
pub use update::{BatchKind, BatchOutcome, MAX_BATCH_SIZE, UpdateReport, apply, batches};
