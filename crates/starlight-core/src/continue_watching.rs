//! "Continue watching": unwatched episodes across all bookmarks.
//!
//! The full list is fetched once per visit (or after [`ContinueWatching::reset`]),
//! then paged, and trimmed in memory as episodes get marked watched.

use crate::api::{fetch_all_episodes, StarlightApi};
use crate::models::{BookmarkRecord, UnwatchedEpisode, WatchedMap};

/// One bookmarked anime whose episodes could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationFailure {
    pub anime_session_id: String,
    pub anime_title: String,
    pub message: String,
}

/// Result of one full fetch pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub bookmark_count: usize,
    pub episodes: Vec<UnwatchedEpisode>,
    pub failures: Vec<AggregationFailure>,
}

/// Walk every bookmark, fetch its episodes, drop the watched ones and
/// return the sorted remainder.
///
/// Requests are strictly sequential. An anime whose fetch fails is
/// recorded in `failures` and skipped; the others still contribute.
pub async fn aggregate<A: StarlightApi>(
    api: &A,
    bookmarks: &[BookmarkRecord],
    watched: &WatchedMap,
) -> Aggregation {
    let mut episodes = Vec::new();
    let mut failures = Vec::new();

    for bookmark in bookmarks {
        match fetch_all_episodes(api, &bookmark.session_id).await {
            Ok(all) => {
                episodes.extend(
                    all.into_iter()
                        .filter(|e| !watched.contains(&bookmark.session_id, &e.session))
                        .map(|episode| UnwatchedEpisode {
                            anime_session_id: bookmark.session_id.clone(),
                            anime_title: bookmark.title.clone(),
                            anime_poster: bookmark.poster.clone(),
                            episode,
                        }),
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    anime = %bookmark.session_id,
                    title = %bookmark.title,
                    "Skipping anime in continue watching"
                );
                failures.push(AggregationFailure {
                    anime_session_id: bookmark.session_id.clone(),
                    anime_title: bookmark.title.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    sort_unwatched(&mut episodes);
    tracing::info!(
        bookmarks = bookmarks.len(),
        unwatched = episodes.len(),
        failed = failures.len(),
        "Aggregated continue watching"
    );

    Aggregation {
        bookmark_count: bookmarks.len(),
        episodes,
        failures,
    }
}

/// Anime title (case-insensitive) first, then episode number.
pub fn sort_unwatched(episodes: &mut [UnwatchedEpisode]) {
    episodes.sort_by(|a, b| {
        a.anime_title
            .to_lowercase()
            .cmp(&b.anime_title.to_lowercase())
            .then_with(|| a.episode.episode.total_cmp(&b.episode.episode))
    });
}

/// What the continue-watching section should display.
#[derive(Debug, PartialEq)]
pub enum ContinueWatchingView<'a> {
    /// First load has not completed yet.
    Loading,
    NoBookmarks,
    /// Every bookmarked anime failed to load.
    Failed,
    AllCaughtUp,
    Page {
        items: &'a [UnwatchedEpisode],
        page: usize,
        total_pages: usize,
    },
}

/// In-memory state of the continue-watching section.
#[derive(Debug)]
pub struct ContinueWatching {
    page_size: usize,
    page: usize,
    aggregation: Option<Aggregation>,
}

impl ContinueWatching {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            aggregation: None,
        }
    }

    /// Whether the next render needs a full fetch.
    pub fn needs_fetch(&self) -> bool {
        self.aggregation.is_none()
    }

    /// Install a finished fetch and go back to page one. `watched` is the
    /// store as of now: episodes marked while the fetch ran are dropped.
    pub fn replace(&mut self, aggregation: Aggregation, watched: &WatchedMap) {
        self.aggregation = Some(aggregation);
        self.page = 1;
        self.apply_watched(watched);
    }

    /// Drop the cached list so the next render fetches again.
    pub fn reset(&mut self) {
        self.aggregation = None;
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        let len = self.aggregation.as_ref().map_or(0, |a| a.episodes.len());
        len.div_ceil(self.page_size).max(1)
    }

    /// Move to `page`, clamped to the available range. No fetch.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    pub fn failures(&self) -> &[AggregationFailure] {
        self.aggregation
            .as_ref()
            .map(|a| a.failures.as_slice())
            .unwrap_or_default()
    }

    /// Drop episodes that are now watched. Returns whether anything changed.
    pub fn apply_watched(&mut self, watched: &WatchedMap) -> bool {
        let Some(aggregation) = self.aggregation.as_mut() else {
            return false;
        };
        let before = aggregation.episodes.len();
        aggregation
            .episodes
            .retain(|e| !watched.contains(&e.anime_session_id, &e.episode.session));
        let changed = aggregation.episodes.len() != before;
        if changed {
            self.set_page(self.page);
        }
        changed
    }

    pub fn view(&self) -> ContinueWatchingView<'_> {
        let Some(aggregation) = self.aggregation.as_ref() else {
            return ContinueWatchingView::Loading;
        };
        if aggregation.bookmark_count == 0 {
            return ContinueWatchingView::NoBookmarks;
        }
        if aggregation.episodes.is_empty() {
            return if aggregation.failures.len() == aggregation.bookmark_count {
                ContinueWatchingView::Failed
            } else {
                ContinueWatchingView::AllCaughtUp
            };
        }

        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(aggregation.episodes.len());
        ContinueWatchingView::Page {
            items: &aggregation.episodes[start..end],
            page: self.page,
            total_pages: self.total_pages(),
        }
    }
}
