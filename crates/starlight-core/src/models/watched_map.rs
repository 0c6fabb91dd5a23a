use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Anime session id → set of watched episode session ids.
///
/// Serialized as a plain JSON object of arrays. An anime with no watched
/// episodes has no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchedMap(BTreeMap<String, BTreeSet<String>>);

impl WatchedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, anime: &str, episode: &str) -> bool {
        self.0
            .get(anime)
            .is_some_and(|episodes| episodes.contains(episode))
    }

    /// Flip membership. Returns whether the episode is now watched.
    pub fn toggle(&mut self, anime: &str, episode: &str) -> bool {
        let episodes = self.0.entry(anime.to_string()).or_default();
        let watched = if episodes.remove(episode) {
            false
        } else {
            episodes.insert(episode.to_string());
            true
        };
        if episodes.is_empty() {
            self.0.remove(anime);
        }
        watched
    }

    /// Add every id to the anime's set. Returns how many were new.
    pub fn insert_all<I, S>(&mut self, anime: &str, episodes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.0.entry(anime.to_string()).or_default();
        let before = set.len();
        set.extend(episodes.into_iter().map(Into::into));
        let added = set.len() - before;
        if set.is_empty() {
            self.0.remove(anime);
        }
        added
    }

    /// Drop the anime's entry. Returns whether anything was removed.
    pub fn clear(&mut self, anime: &str) -> bool {
        self.0.remove(anime).is_some()
    }

    pub fn episodes(&self, anime: &str) -> Option<&BTreeSet<String>> {
        self.0.get(anime)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
