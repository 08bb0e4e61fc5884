//! Up-next queue
//!
//! Ordered list of tracks waiting to play after the current one. The queue
//! never holds two entries with the same track key, and never holds the
//! currently playing track once it has been taken.

use crate::shuffle::pick_index;
use nextsound_core::{Track, TrackKey};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track unless it is already queued
    ///
    /// Returns false when an entry with the same key exists.
    pub fn enqueue(&mut self, track: Track) -> bool {
        if self.contains(&track.key()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Take the next track to play
    ///
    /// Head of the queue, or a random entry when shuffled.
    pub fn dequeue_next<R: Rng + ?Sized>(&mut self, shuffled: bool, rng: &mut R) -> Option<Track> {
        let index = pick_index(self.tracks.len(), shuffled, rng)?;
        Some(self.tracks.remove(index))
    }

    /// Remove the entry at `index`; out of range is a no-op
    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        (index < self.tracks.len()).then(|| self.tracks.remove(index))
    }

    /// Replace the whole queue, keeping the first occurrence of each key
    pub fn replace_all(&mut self, tracks: impl IntoIterator<Item = Track>) {
        let mut seen = HashSet::new();
        self.tracks = tracks
            .into_iter()
            .filter(|track| seen.insert(track.key()))
            .collect();
    }

    pub fn contains(&self, key: &TrackKey) -> bool {
        self.tracks
            .iter()
            .any(|t| t.provider == key.provider && t.id == key.id)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.clone()
    }
}
