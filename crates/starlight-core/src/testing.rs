//! In-memory fakes shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crate::api::StarlightApi;
use crate::error::StarlightError;
use crate::models::{BookmarkRecord, DownloadLink, Episode, EpisodeNumber, EpisodePage, Pagination};
use crate::store::KeyValueStore;
use crate::view::{Delay, DownloadView, ModalView, ToggleIcon};

pub fn record(session_id: &str, title: &str) -> BookmarkRecord {
    BookmarkRecord {
        session_id: session_id.into(),
        title: title.into(),
        poster: format!("https://i.animepahe.ru/posters/{session_id}.jpg"),
        media_type: "TV".into(),
        year: "2024".into(),
    }
}

pub fn episode(session: &str, number: f64) -> Episode {
    Episode {
        session: session.into(),
        episode: EpisodeNumber(number),
        title: None,
        duration: Some("00:23:40".into()),
        snapshot: None,
    }
}

// ── API ─────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FakeError {
    #[error("HTTP error (status {0})")]
    Status(u16),
    #[error("unknown anime: {0}")]
    Unknown(String),
}

#[derive(Debug, Default)]
pub struct FakeApi {
    pages: HashMap<String, Vec<EpisodePage>>,
    failures: HashSet<(String, u32)>,
    downloads: Option<Result<Vec<DownloadLink>, u16>>,
    calls: RefCell<Vec<(String, u32)>>,
    download_calls: Cell<usize>,
}

impl FakeApi {
    /// Register an anime whose episode list spans `pages.len()` pages.
    pub fn with_pages(mut self, anime: &str, mut pages: Vec<Vec<Episode>>) -> Self {
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        let last_page = pages.len() as u32;
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, episodes)| EpisodePage {
                episodes,
                pagination: Pagination {
                    current_page: Some(i as u32 + 1),
                    last_page,
                },
                error: None,
            })
            .collect();
        self.pages.insert(anime.into(), pages);
        self
    }

    pub fn with_raw_page(mut self, anime: &str, page: EpisodePage) -> Self {
        self.pages.entry(anime.into()).or_default().push(page);
        self
    }

    pub fn failing_at(mut self, anime: &str, page: u32) -> Self {
        self.failures.insert((anime.into(), page));
        self
    }

    pub fn with_downloads(mut self, downloads: Result<Vec<DownloadLink>, u16>) -> Self {
        self.downloads = Some(downloads);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.borrow().clone()
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.get()
    }
}

impl StarlightApi for FakeApi {
    type Error = FakeError;

    async fn episode_page(&self, anime_session: &str, page: u32) -> Result<EpisodePage, FakeError> {
        self.calls.borrow_mut().push((anime_session.to_string(), page));
        if self.failures.contains(&(anime_session.to_string(), page)) {
            return Err(FakeError::Status(500));
        }
        page.checked_sub(1)
            .and_then(|i| self.pages.get(anime_session)?.get(i as usize))
            .cloned()
            .ok_or_else(|| FakeError::Unknown(anime_session.to_string()))
    }

    async fn episode_downloads(
        &self,
        _anime_session: &str,
        _episode_session: &str,
    ) -> Result<Vec<DownloadLink>, FakeError> {
        self.download_calls.set(self.download_calls.get() + 1);
        match &self.downloads {
            Some(Ok(links)) => Ok(links.clone()),
            Some(Err(status)) => Err(FakeError::Status(*status)),
            None => Ok(Vec::new()),
        }
    }
}

// ── Storage ─────────────────────────────────────────────────────

/// A backend where every read and write fails.
#[derive(Debug)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StarlightError> {
        Err(StarlightError::Storage("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StarlightError> {
        Err(StarlightError::Storage("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StarlightError> {
        Err(StarlightError::Storage("storage disabled".into()))
    }
}

// ── Views ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingIcon {
    pub state: Cell<Option<bool>>,
    pub renders: Cell<usize>,
}

impl ToggleIcon for RecordingIcon {
    fn render(&self, active: bool) {
        self.state.set(Some(active));
        self.renders.set(self.renders.get() + 1);
    }
}

/// Modal + download view that records what a user would see.
#[derive(Debug, Default)]
pub struct RecordingModal {
    pub events: RefCell<Vec<&'static str>>,
    pub visible: Cell<bool>,
    pub active: Cell<bool>,
    pub title: RefCell<String>,
    pub loading: Cell<bool>,
    pub links: RefCell<Vec<DownloadLink>>,
    pub empty: Cell<bool>,
    pub error: RefCell<Option<String>>,
}

impl ModalView for RecordingModal {
    fn show(&self) {
        self.events.borrow_mut().push("show");
        self.visible.set(true);
    }

    fn hide(&self) {
        self.events.borrow_mut().push("hide");
        self.visible.set(false);
    }

    fn set_active(&self, active: bool) {
        self.events.borrow_mut().push(if active { "activate" } else { "deactivate" });
        self.active.set(active);
    }

    fn reset(&self) {
        self.events.borrow_mut().push("reset");
        self.show_loading();
    }
}

impl DownloadView for RecordingModal {
    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn show_loading(&self) {
        self.loading.set(true);
        self.links.borrow_mut().clear();
        self.empty.set(false);
        *self.error.borrow_mut() = None;
    }

    fn show_links(&self, links: &[DownloadLink]) {
        self.loading.set(false);
        self.links.borrow_mut().extend_from_slice(links);
    }

    fn show_empty(&self) {
        self.loading.set(false);
        self.empty.set(true);
    }

    fn show_error(&self, message: &str) {
        self.loading.set(false);
        *self.error.borrow_mut() = Some(message.to_string());
    }
}

// ── Timers ──────────────────────────────────────────────────────

/// Suspends exactly once, so interleavings around a delay can be tested.
#[derive(Debug, Clone, Copy)]
pub struct YieldDelay;

impl Delay for YieldDelay {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        YieldOnce(false)
    }
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
