use std::collections::HashMap;

use crate::types::Track;

/// Occurrence counts per remote id, with the display name seen for each id.
///
/// Both maps are filled in the same call, so every counted id has a name.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: HashMap<String, u32>,
    names: HashMap<String, String>,
}

impl Tally {
    /// Counts one more track for `id`.
    pub fn record(&mut self, id: &str, name: &str) {
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
        self.names
            .entry(id.to_string())
            .or_insert_with(|| name.to_string());
    }

    pub fn count(&self, id: &str) -> Option<u32> {
        self.counts.get(id).copied()
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Entities counted at least `threshold` times, sorted by name.
    ///
    /// Names compare by code point; equal names fall back to the id so the
    /// order is total. A threshold of 1 or less selects everything counted.
    pub fn select(&self, threshold: i64) -> Vec<Selected> {
        let mut selected: Vec<Selected> = self
            .counts
            .iter()
            .filter(|(_, count)| i64::from(**count) >= threshold)
            .map(|(id, count)| Selected {
                id: id.clone(),
                name: self.names.get(id).cloned().unwrap_or_default(),
                tracks: *count,
            })
            .collect();

        selected.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        selected
    }
}

/// Artist and album tallies over a set of saved tracks.
#[derive(Debug, Clone, Default)]
pub struct LibraryTally {
    pub artists: Tally,
    pub albums: Tally,
}

/// One pass over `tracks`: each track counts once for each of its artists
/// and once for its album. References without an id (local files) are skipped.
pub fn tally(tracks: &[Track]) -> LibraryTally {
    let mut result = LibraryTally::default();

    for track in tracks {
        for artist in &track.artists {
            if let Some(id) = &artist.id {
                result.artists.record(id, &artist.name);
            }
        }
        if let Some(id) = &track.album.id {
            result.albums.record(id, &track.album.name);
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub id: String,
    pub name: String,
    /// Saved tracks referencing this artist or album.
    pub tracks: u32,
}

/// Artists and albums that met their thresholds.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub artists: Vec<Selected>,
    pub albums: Vec<Selected>,
}

impl Selection {
    pub fn artist_ids(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.id.clone()).collect()
    }

    pub fn album_ids(&self) -> Vec<String> {
        self.albums.iter().map(|a| a.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty()
    }
}

/// Tallies `tracks` and keeps the artists and albums at or above their thresholds.
///
/// # Arguments
///
/// * `tracks` - Saved tracks as returned by the fetcher
/// * `artist_threshold` - Minimum saved tracks an artist needs
/// * `album_threshold` - Minimum saved tracks an album needs
///
/// # Returns
///
/// A [`Selection`] whose artists and albums are each sorted by name.
///
/// # Example
///
/// ```
/// let selection = aggregate(&tracks, 3, 5);
/// for artist in &selection.artists {
///     println!("{} ({} tracks)", artist.name, artist.tracks);
/// }
/// ```
pub fn aggregate(tracks: &[Track], artist_threshold: i64, album_threshold: i64) -> Selection {
    let tally = tally(tracks);
    Selection {
        artists: tally.artists.select(artist_threshold),
        albums: tally.albums.select(album_threshold),
    }
}
