mod common;

use std::{collections::VecDeque, time::Duration};

use common::{FakeLibrary, create_test_track};
use dewey::curation::{
    PAGE_SIZE, PROGRESS_INTERVAL, RetryPolicy, crosses_progress_mark, fetch::fetch_page,
    fetch_all_saved_tracks,
};
use dewey::error::FetchError;
use dewey::types::{SavedTrack, Track};

fn no_delay() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
    }
}

fn library_of(n: usize) -> FakeLibrary {
    let tracks: Vec<Track> = (0..n)
        .map(|i| {
            create_test_track(
                &format!("t{}", i),
                &[(format!("ar{}", i % 7).as_str(), "Artist")],
                (format!("al{}", i % 11).as_str(), "Album"),
            )
        })
        .collect();
    FakeLibrary::with_tracks(tracks)
}

#[test]
fn test_default_retry_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay, Duration::from_secs(3));
}

#[tokio::test]
async fn test_fetches_every_page_in_order() {
    let mut library = library_of(123);

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    assert_eq!(tracks.len(), 123);
    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone().unwrap()).collect();
    let expected: Vec<String> = (0..123).map(|i| format!("t{}", i)).collect();
    assert_eq!(ids, expected);

    // Existence check, then pages at offsets 0, 50, 100
    let offsets: Vec<u64> = library.page_requests.iter().map(|(_, o)| *o).collect();
    assert_eq!(offsets, vec![0, 0, 50, 100]);
    assert!(library.page_requests[1..].iter().all(|(l, _)| *l == PAGE_SIZE));
}

#[tokio::test]
async fn test_empty_library() {
    let mut library = FakeLibrary::default();

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    assert!(tracks.is_empty());
    assert_eq!(library.page_requests.len(), 1);
}

#[tokio::test]
async fn test_account_unreachable_is_not_retried() {
    let mut library = FakeLibrary {
        account_unreachable: true,
        ..library_of(10)
    };

    let result = fetch_all_saved_tracks(&mut library, &no_delay()).await;

    assert!(matches!(result, Err(FetchError::AccountUnreachable(_))));
    assert_eq!(library.page_requests.len(), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mut library = FakeLibrary {
        page_failures: VecDeque::from(vec![true, true, false, true, false]),
        ..library_of(60)
    };

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    assert_eq!(tracks.len(), 60);
    // 1 check + 3 attempts for offset 0 + 2 attempts for offset 50
    assert_eq!(library.page_requests.len(), 6);
}

#[tokio::test]
async fn test_retry_exhaustion_fails_deterministically() {
    let mut library = FakeLibrary {
        pages_always_fail: true,
        ..library_of(75)
    };

    let result = fetch_all_saved_tracks(&mut library, &no_delay()).await;

    match result {
        Err(FetchError::PageFailed {
            offset, attempts, ..
        }) => {
            assert_eq!(offset, 0);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected PageFailed, got {:?}", other.map(|t| t.len())),
    }
    assert_eq!(library.page_requests.len(), 4);
}

#[tokio::test]
async fn test_fetch_page_with_single_attempt() {
    let mut library = FakeLibrary {
        pages_always_fail: true,
        ..library_of(5)
    };
    // The first call to the fake is its existence check and always succeeds
    library.page_requests.push((1, 0));

    let policy = RetryPolicy {
        max_attempts: 1,
        delay: Duration::ZERO,
    };
    let result = fetch_page(&mut library, 0, &policy).await;

    assert!(matches!(
        result,
        Err(FetchError::PageFailed { attempts: 1, .. })
    ));
}

#[tokio::test]
async fn test_unavailable_items_advance_offset() {
    let mut library = library_of(55);
    library.tracks[3] = SavedTrack {
        added_at: None,
        track: None,
    };

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    assert_eq!(tracks.len(), 54);
    let offsets: Vec<u64> = library.page_requests.iter().map(|(_, o)| *o).collect();
    assert_eq!(offsets, vec![0, 0, 50]);
}

#[tokio::test]
async fn test_shrinking_library_stops_instead_of_spinning() {
    let mut library = FakeLibrary {
        total: Some(80),
        ..library_of(50)
    };

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    assert_eq!(tracks.len(), 50);
    assert_eq!(library.page_requests.len(), 3);
}

#[tokio::test]
async fn test_huge_reported_total_does_not_preallocate() {
    let mut library = library_of(3);
    library.total = Some(u64::MAX / 2);

    let tracks = fetch_all_saved_tracks(&mut library, &no_delay()).await.unwrap();

    // The fourth page comes back empty and ends the fetch
    assert_eq!(tracks.len(), 3);
    let offsets: Vec<u64> = library.page_requests.iter().map(|(_, o)| *o).collect();
    assert_eq!(offsets, vec![0, 0, 3]);
}

#[test]
fn test_progress_mark_crossed_between_pages() {
    assert_eq!(PROGRESS_INTERVAL, 1000);

    // Landing exactly on a multiple
    assert!(crosses_progress_mark(950, 1000));
    assert!(crosses_progress_mark(1950, 2000));

    // Jumping over a multiple without landing on it
    assert!(crosses_progress_mark(990, 1040));
    assert!(crosses_progress_mark(1999, 2001));

    // Staying inside one interval
    assert!(!crosses_progress_mark(0, 50));
    assert!(!crosses_progress_mark(1000, 1050));
    assert!(!crosses_progress_mark(1900, 1999));
}

#[test]
fn test_progress_marks_over_full_pages() {
    let offsets: Vec<u64> = (0..=60).map(|page| page * u64::from(PAGE_SIZE)).collect();
    let crossed = offsets
        .windows(2)
        .filter(|pair| crosses_progress_mark(pair[0], pair[1]))
        .count();

    // 3000 items in pages of 50 pass 1000, 2000 and 3000
    assert_eq!(crossed, 3);
}
