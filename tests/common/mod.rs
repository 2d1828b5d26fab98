#![allow(dead_code)]

use std::collections::VecDeque;

use dewey::{
    error::ApiError,
    spotify::LibraryService,
    types::{Album, Artist, SavedTrack, SavedTracksPage, Track},
};

// Helper function to create a test track
pub fn create_test_track(id: &str, artists: &[(&str, &str)], album: (&str, &str)) -> Track {
    Track {
        id: Some(id.to_string()),
        name: format!("Track {}", id),
        artists: artists
            .iter()
            .map(|(id, name)| Artist {
                id: Some(id.to_string()),
                name: name.to_string(),
            })
            .collect(),
        album: Album {
            id: Some(album.0.to_string()),
            name: album.1.to_string(),
        },
    }
}

pub fn ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

/// In-memory library: serves a fixed list of saved tracks and records writes.
#[derive(Default)]
pub struct FakeLibrary {
    pub tracks: Vec<SavedTrack>,
    /// Reported total; defaults to the number of tracks.
    pub total: Option<u64>,
    /// Scripted failures for `saved_tracks`, consumed one per call.
    pub page_failures: VecDeque<bool>,
    /// Every failing call fails, once the first request went through.
    pub pages_always_fail: bool,
    pub account_unreachable: bool,
    /// Fail the follow/save call with this (0-based) index.
    pub fail_write_at: Option<usize>,
    pub page_requests: Vec<(u32, u64)>,
    pub writes: Vec<(&'static str, Vec<String>)>,
}

impl FakeLibrary {
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks: tracks
                .into_iter()
                .map(|t| SavedTrack {
                    added_at: None,
                    track: Some(t),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn record_write(&mut self, kind: &'static str, ids: &[String]) -> Result<(), ApiError> {
        let index = self.writes.len();
        self.writes.push((kind, ids.to_vec()));
        if self.fail_write_at == Some(index) {
            return Err(ApiError::Status {
                status: 502,
                message: "Bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

impl LibraryService for FakeLibrary {
    async fn saved_tracks(&mut self, limit: u32, offset: u64) -> Result<SavedTracksPage, ApiError> {
        let first_request = self.page_requests.is_empty();
        self.page_requests.push((limit, offset));

        if first_request && self.account_unreachable {
            return Err(ApiError::Status {
                status: 404,
                message: "account unreachable".to_string(),
            });
        }
        if !first_request
            && (self.pages_always_fail || self.page_failures.pop_front().unwrap_or(false))
        {
            return Err(ApiError::Status {
                status: 503,
                message: "transient failure".to_string(),
            });
        }

        let start = (offset as usize).min(self.tracks.len());
        let end = (start + limit as usize).min(self.tracks.len());
        Ok(SavedTracksPage {
            items: self.tracks[start..end].to_vec(),
            total: self.total.unwrap_or(self.tracks.len() as u64),
            next: None,
        })
    }

    async fn follow_artists(&mut self, ids: &[String]) -> Result<(), ApiError> {
        self.record_write("artists", ids)
    }

    async fn save_albums(&mut self, ids: &[String]) -> Result<(), ApiError> {
        self.record_write("albums", ids)
    }
}
