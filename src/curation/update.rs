use std::fmt;

use crate::{error::ApiError, info, spotify::LibraryService};

/// Most ids Spotify accepts in one follow or save call.
pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    FollowArtists,
    SaveAlbums,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchKind::FollowArtists => write!(f, "follow artists"),
            BatchKind::SaveAlbums => write!(f, "save albums"),
        }
    }
}

/// Result of one write call.
#[derive(Debug)]
pub struct BatchOutcome {
    pub kind: BatchKind,
    pub ids: Vec<String>,
    pub error: Option<ApiError>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-batch outcomes of [`apply`], in the order the calls were made.
///
/// Batches after the first failure are never attempted, so at most the last
/// outcome carries an error.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub batches: Vec<BatchOutcome>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.batches.iter().all(BatchOutcome::succeeded)
    }

    pub fn first_failure(&self) -> Option<&BatchOutcome> {
        self.batches.iter().find(|b| !b.succeeded())
    }

    /// Ids written successfully for batches of `kind`.
    pub fn written(&self, kind: BatchKind) -> usize {
        self.batches
            .iter()
            .filter(|b| b.kind == kind && b.succeeded())
            .map(|b| b.ids.len())
            .sum()
    }

    pub fn succeeded_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.succeeded()).count()
    }
}

/// Splits `ids` into contiguous chunks of at most [`MAX_BATCH_SIZE`].
pub fn batches(ids: &[String]) -> impl Iterator<Item = &[String]> {
    ids.chunks(MAX_BATCH_SIZE)
}

/// Follows `artist_ids`, then saves `album_ids`, one call per batch in list order.
///
/// Nothing is retried. The first failing batch is recorded and ends the
/// update; earlier batches stay applied.
///
/// # Arguments
///
/// * `service` - Session the follow and save calls go to
/// * `artist_ids` - Artists to follow, in the order they were selected
/// * `album_ids` - Albums to save, in the order they were selected
///
/// # Returns
///
/// An [`UpdateReport`] with one outcome per call that was made.
pub async fn apply<S: LibraryService>(
    service: &mut S,
    artist_ids: &[String],
    album_ids: &[String],
) -> UpdateReport {
    let mut report = UpdateReport::default();

    info!("Adding artists to library...");
    if !run_batches(service, BatchKind::FollowArtists, artist_ids, &mut report).await {
        return report;
    }

    info!("Adding albums to library...");
    run_batches(service, BatchKind::SaveAlbums, album_ids, &mut report).await;
    report
}

async fn run_batches<S: LibraryService>(
    service: &mut S,
    kind: BatchKind,
    ids: &[String],
    report: &mut UpdateReport,
) -> bool {
    for batch in batches(ids) {
        log::debug!("{}: sending batch of {}", kind, batch.len());
        let result = match kind {
            BatchKind::FollowArtists => service.follow_artists(batch).await,
            BatchKind::SaveAlbums => service.save_albums(batch).await,
        };

        let failed = result.is_err();
        report.batches.push(BatchOutcome {
            kind,
            ids: batch.to_vec(),
            error: result.err(),
        });

        if failed {
            return false;
        }
    }

    true
}
