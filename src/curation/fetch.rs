use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    error::{ApiError, FetchError},
    info,
    spotify::LibraryService,
    success,
    types::{SavedTracksPage, Track},
    warning,
};

/// Largest page the saved-tracks endpoint returns.
pub const PAGE_SIZE: u32 = 50;

/// A status line is printed each time this many more items were fetched.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

/// Retrieves every saved track of the session's user, in Spotify's order.
///
/// A first request learns the total count; failing it means the account
/// cannot be reached and nothing is retried. Pages of up to [`PAGE_SIZE`]
/// items are then requested, advancing the offset by the number of items
/// each page actually returned, until the total is reached. Saved items whose
/// track is no longer available advance the offset but are dropped.
///
/// A status line is printed whenever another [`PROGRESS_INTERVAL`] items
/// came in.
///
/// # Arguments
///
/// * `service` - Authorized session, or any other [`LibraryService`]
/// * `policy` - Retry behaviour applied to every page after the first request
///
/// # Returns
///
/// The available tracks in the order Spotify lists them.
///
/// # Errors
///
/// - [`FetchError::AccountUnreachable`] if the first request fails
/// - [`FetchError::PageFailed`] if a page fails on every attempt of `policy`
pub async fn fetch_all_saved_tracks<S: LibraryService>(
    service: &mut S,
    policy: &RetryPolicy,
) -> Result<Vec<Track>, FetchError> {
    info!("I'm looking up your account...");
    let total = service
        .saved_tracks(1, 0)
        .await
        .map_err(FetchError::AccountUnreachable)?
        .total;
    info!("You've saved {} tracks. Fetching track info...", total);

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut tracks: Vec<Track> = Vec::new();
    let mut offset: u64 = 0;

    while offset < total {
        let page = match fetch_page(service, offset, policy).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        if page.items.is_empty() {
            pb.finish_and_clear();
            warning!(
                "Spotify returned no tracks at offset {} of {}; your library may have changed.",
                offset,
                total
            );
            break;
        }

        let previous = offset;
        offset += page.items.len() as u64;
        tracks.extend(page.items.into_iter().filter_map(|item| item.track));
        pb.set_position(offset.min(total));

        if crosses_progress_mark(previous, offset) {
            let current = tracks.last().map(|t| t.name.as_str()).unwrap_or_default();
            pb.suspend(|| {
                info!(
                    "{} remaining. Currently fetching {}",
                    total.saturating_sub(offset),
                    current
                )
            });
        }
    }

    pb.finish_and_clear();
    success!("OK, I fetched {} tracks.", tracks.len());
    Ok(tracks)
}

/// Whether advancing from `previous` to `offset` passed a multiple of
/// [`PROGRESS_INTERVAL`].
///
/// Pages rarely land exactly on a multiple, so the check compares which
/// interval both offsets fall into.
///
/// # Example
///
/// ```
/// assert!(crosses_progress_mark(990, 1040));
/// assert!(!crosses_progress_mark(1000, 1050));
/// ```
pub fn crosses_progress_mark(previous: u64, offset: u64) -> bool {
    offset / PROGRESS_INTERVAL > previous / PROGRESS_INTERVAL
}

/// Requests one page, retrying per `policy`.
///
/// # Arguments
///
/// * `service` - Session the page is requested from
/// * `offset` - Index of the first saved item of the page
/// * `policy` - Number of attempts and the delay between them
///
/// # Returns
///
/// - `Ok(SavedTracksPage)` - The first page that came back
/// - `Err(FetchError::PageFailed)` - Every attempt failed; carries the last error
///
/// Exhaustion never yields an empty page.
pub async fn fetch_page<S: LibraryService>(
    service: &mut S,
    offset: u64,
    policy: &RetryPolicy,
) -> Result<SavedTracksPage, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err: ApiError = match service.saved_tracks(PAGE_SIZE, offset).await {
            Ok(page) => return Ok(page),
            Err(e) => e,
        };

        if attempt >= max_attempts {
            log::warn!(
                "Page at offset {} failed {} times, giving up: {}",
                offset,
                attempt,
                err
            );
            return Err(FetchError::PageFailed {
                offset,
                attempts: attempt,
                source: err,
            });
        }

        warning!(
            "Request failed. Waiting {} seconds before retrying...",
            policy.delay.as_secs()
        );
        log::debug!("Attempt {} at offset {} failed: {}", attempt, offset, err);
        sleep(policy.delay).await;
    }
}
