//! DOM implementations of the core view traits.

use std::cell::RefCell;

use starlight_core::bookmarks;
use starlight_core::continue_watching::{ContinueWatching, ContinueWatchingView};
use starlight_core::models::{BookmarkRecord, DownloadLink, EpisodeSelection, UnwatchedEpisode};
use starlight_core::routes;
use starlight_core::view::{DownloadView, ModalView, ToggleIcon};
use starlight_core::watched;
use web_sys::{Document, Element};

use crate::dom::{self, set_hidden};

const BOOKMARKED_ICON: &str = r#"<svg class="h-6 w-6" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M20 12H4"></path></svg>"#;
const UNBOOKMARKED_ICON: &str = r#"<svg class="h-6 w-6" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 6v6m0 0v6m0-6h6m-6 0H6"></path></svg>"#;

const ACTIVE_ICON: &[&str] = &["text-green-400"];
const INACTIVE_ICON: &[&str] = &["text-gray-400", "hover:text-green-300"];

// ── Icons ───────────────────────────────────────────────────────

pub struct BookmarkIcon(pub Element);

impl ToggleIcon for BookmarkIcon {
    fn render(&self, active: bool) {
        let el = &self.0;
        if active {
            dom::remove_classes(el, INACTIVE_ICON);
            dom::add_classes(el, ACTIVE_ICON);
            el.set_inner_html(BOOKMARKED_ICON);
        } else {
            dom::remove_classes(el, ACTIVE_ICON);
            dom::add_classes(el, INACTIVE_ICON);
            el.set_inner_html(UNBOOKMARKED_ICON);
        }
        let _ = el.set_attribute("title", bookmarks::tooltip(active));
    }
}

pub struct WatchedIcon(pub Element);

impl ToggleIcon for WatchedIcon {
    fn render(&self, active: bool) {
        let el = &self.0;
        if active {
            dom::remove_classes(el, INACTIVE_ICON);
            dom::add_classes(el, ACTIVE_ICON);
        } else {
            dom::remove_classes(el, ACTIVE_ICON);
            dom::add_classes(el, INACTIVE_ICON);
        }
        let _ = el.set_attribute("title", watched::tooltip(active));
        let _ = el.set_attribute("aria-pressed", if active { "true" } else { "false" });
    }
}

// ── Modals ──────────────────────────────────────────────────────

/// Show/hide/active class handling shared by both modals.
pub struct ModalRoot(pub Element);

impl ModalRoot {
    fn show(&self) {
        set_hidden(&self.0, false);
    }

    fn hide(&self) {
        set_hidden(&self.0, true);
    }

    fn set_active(&self, active: bool) {
        if active {
            dom::add_classes(&self.0, &["active"]);
        } else {
            dom::remove_classes(&self.0, &["active"]);
        }
    }
}

/// Access to the element a modal view is mounted on.
pub trait ModalRootElement {
    fn root_element(&self) -> &Element;
}

/// The episode-options modal: a title, a details link and a download button.
pub struct OptionsModal {
    pub root: ModalRoot,
    title: Element,
    details: Element,
    selection: RefCell<Option<EpisodeSelection>>,
}

impl OptionsModal {
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            root: ModalRoot(dom::by_id(document, "episodeOptionsModal")?),
            title: dom::by_id(document, "episodeOptionsModalTitle")?,
            details: dom::by_id(document, "viewDetailsBtn")?,
            selection: RefCell::new(None),
        })
    }

    pub fn select(&self, selection: EpisodeSelection) {
        self.title.set_text_content(Some(&selection.options_title()));
        let href = routes::anime_detail_url(&selection.anime_session_id, &selection.anime_title);
        let _ = self.details.set_attribute("href", &href);
        *self.selection.borrow_mut() = Some(selection);
    }

    pub fn selection(&self) -> Option<EpisodeSelection> {
        self.selection.borrow().clone()
    }
}

impl ModalRootElement for OptionsModal {
    fn root_element(&self) -> &Element {
        &self.root.0
    }
}

impl ModalView for OptionsModal {
    fn show(&self) {
        self.root.show();
    }

    fn hide(&self) {
        self.root.hide();
    }

    fn set_active(&self, active: bool) {
        self.root.set_active(active);
    }

    fn reset(&self) {}
}

/// The download-links modal and its placeholders.
pub struct DownloadModal {
    pub root: ModalRoot,
    document: Document,
    title: Element,
    links: Element,
    loading: Element,
    no_links: Element,
    error: Element,
}

impl DownloadModal {
    pub fn find(document: &Document) -> Option<Self> {
        let title = dom::by_id(document, "downloadModalTitle")
            .or_else(|| dom::by_id(document, "modalTitle"))?;
        Some(Self {
            root: ModalRoot(dom::by_id(document, "downloadModal")?),
            document: document.clone(),
            title,
            links: dom::by_id(document, "downloadLinks")?,
            loading: dom::by_id(document, "loadingMessage")?,
            no_links: dom::by_id(document, "noLinksFound")?,
            error: dom::by_id(document, "errorMessage")?,
        })
    }
}

impl ModalRootElement for DownloadModal {
    fn root_element(&self) -> &Element {
        &self.root.0
    }
}

impl ModalView for DownloadModal {
    fn show(&self) {
        self.root.show();
    }

    fn hide(&self) {
        self.root.hide();
    }

    fn set_active(&self, active: bool) {
        self.root.set_active(active);
    }

    fn reset(&self) {
        self.show_loading();
    }
}

impl DownloadView for DownloadModal {
    fn set_title(&self, title: &str) {
        self.title.set_text_content(Some(title));
    }

    fn show_loading(&self) {
        set_hidden(&self.loading, false);
        set_hidden(&self.no_links, true);
        set_hidden(&self.error, true);
        self.links.set_inner_html("");
        let _ = self.links.append_child(&self.loading);
    }

    fn show_links(&self, links: &[DownloadLink]) {
        set_hidden(&self.loading, true);
        for link in links {
            let Some(a) = dom::create(
                &self.document,
                "a",
                "block px-5 py-3 font-semibold rounded-lg text-center btn-primary",
                Some(&link.text),
            ) else {
                continue;
            };
            let _ = a.set_attribute("href", &link.href);
            let _ = a.set_attribute("target", "_blank");
            let _ = a.set_attribute("rel", "noopener noreferrer");
            let _ = self.links.append_child(&a);
        }
    }

    fn show_empty(&self) {
        set_hidden(&self.loading, true);
        set_hidden(&self.no_links, false);
    }

    fn show_error(&self, message: &str) {
        set_hidden(&self.loading, true);
        self.error.set_text_content(Some(message));
        set_hidden(&self.error, false);
    }
}

// ── Bookmarks page ──────────────────────────────────────────────

pub struct BookmarksPage {
    document: Document,
    list: Element,
    empty_message: Element,
}

impl BookmarksPage {
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            document: document.clone(),
            list: dom::by_id(document, "bookmark-list")?,
            empty_message: dom::by_id(document, "no-bookmarks-message")?,
        })
    }

    /// Replace the list with one card per bookmark. Returns the card icons
    /// so the caller can render them from the store.
    pub fn render(&self, bookmarks: &[BookmarkRecord]) -> Vec<(String, BookmarkIcon)> {
        self.list.set_inner_html("");
        set_hidden(&self.empty_message, !bookmarks.is_empty());
        bookmarks
            .iter()
            .filter_map(|b| self.card(b))
            .collect()
    }

    fn card(&self, anime: &BookmarkRecord) -> Option<(String, BookmarkIcon)> {
        let doc = &self.document;
        let card = dom::create(doc, "a", "anime-card block relative flex flex-col h-full", None)?;
        let _ = card.set_attribute(
            "href",
            &routes::anime_detail_url(&anime.session_id, &anime.title),
        );

        let poster = dom::create(doc, "img", "w-full object-cover", None)?;
        let _ = poster.set_attribute("src", &routes::proxy_image_url(&anime.poster));
        let _ = poster.set_attribute("alt", &format!("Poster for {}", anime.title));
        let _ = poster.set_attribute("loading", "lazy");

        let icon = dom::create(doc, "button", "bookmark-icon absolute top-3 left-3 z-20 p-2", None)?;
        dom::set_data(&icon, "session-id", &anime.session_id);
        dom::set_data(&icon, "anime-title", &anime.title);
        dom::set_data(&icon, "poster", &anime.poster);
        dom::set_data(&icon, "type", &anime.media_type);
        dom::set_data(&icon, "year", anime.display_year());

        let title = dom::create(doc, "h3", "font-extrabold text-lg mb-1 truncate", Some(&anime.title))?;
        let _ = title.set_attribute("title", &anime.title);
        let meta = format!("{} · {}", anime.media_type, anime.display_year());
        let meta = dom::create(doc, "p", "text-sm font-medium", Some(&meta))?;

        let body = dom::create(doc, "div", "p-4 text-center flex-grow", None)?;
        let _ = body.append_child(&title);
        let _ = body.append_child(&meta);
        let _ = card.append_child(&poster);
        let _ = card.append_child(&icon);
        let _ = card.append_child(&body);
        let _ = self.list.append_child(&card);

        Some((anime.session_id.clone(), BookmarkIcon(icon)))
    }
}

// ── Continue watching ───────────────────────────────────────────

pub const NO_BOOKMARKS_MESSAGE: &str =
    "You haven't bookmarked any anime yet. Bookmark a show to track its episodes here.";
pub const CAUGHT_UP_MESSAGE: &str = "You're all caught up! No unwatched episodes left.";
pub const FAILED_MESSAGE: &str = "Could not load your episodes. Please try again later.";
pub const LOADING_MESSAGE: &str = "Loading unwatched episodes...";

pub struct ContinueWatchingSection {
    document: Document,
    list: Element,
    status: Element,
    errors: Element,
    pagination: Element,
}

impl ContinueWatchingSection {
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            document: document.clone(),
            list: dom::by_id(document, "continue-watching-list")?,
            status: dom::by_id(document, "continue-watching-status")?,
            errors: dom::by_id(document, "continue-watching-errors")?,
            pagination: dom::by_id(document, "continue-watching-pagination")?,
        })
    }

    /// Redraw from state. Returns the watched icons of the visible cards.
    pub fn render(&self, state: &ContinueWatching) -> Vec<(String, String, WatchedIcon)> {
        self.list.set_inner_html("");
        self.pagination.set_inner_html("");
        self.render_failures(state);

        let message = match state.view() {
            ContinueWatchingView::Loading => LOADING_MESSAGE,
            ContinueWatchingView::NoBookmarks => NO_BOOKMARKS_MESSAGE,
            ContinueWatchingView::Failed => FAILED_MESSAGE,
            ContinueWatchingView::AllCaughtUp => CAUGHT_UP_MESSAGE,
            ContinueWatchingView::Page {
                items,
                page,
                total_pages,
            } => {
                set_hidden(&self.status, true);
                let icons = items.iter().filter_map(|e| self.card(e)).collect();
                self.render_pagination(page, total_pages);
                return icons;
            }
        };
        self.status.set_text_content(Some(message));
        set_hidden(&self.status, false);
        Vec::new()
    }

    fn render_failures(&self, state: &ContinueWatching) {
        self.errors.set_inner_html("");
        for failure in state.failures() {
            let text = format!("Failed to load episodes for {}.", failure.anime_title);
            if let Some(banner) = dom::create(&self.document, "p", "error-banner", Some(&text)) {
                let _ = banner.set_attribute("title", &failure.message);
                let _ = self.errors.append_child(&banner);
            }
        }
        set_hidden(&self.errors, state.failures().is_empty());
    }

    fn card(&self, item: &UnwatchedEpisode) -> Option<(String, String, WatchedIcon)> {
        let doc = &self.document;
        let number = item.episode.episode.to_string();

        let card = dom::create(doc, "div", "episode-card relative cursor-pointer", None)?;
        dom::set_data(&card, "anime-session-id", &item.anime_session_id);
        dom::set_data(&card, "anime-title", &item.anime_title);
        dom::set_data(&card, "episode-session-id", &item.episode.session);
        dom::set_data(&card, "episode-number", &number);

        let image = item
            .episode
            .snapshot
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(item.anime_poster.as_str()).filter(|p| !p.is_empty()));
        if let Some(image) = image {
            let img = dom::create(doc, "img", "w-full object-cover", None)?;
            let _ = img.set_attribute("src", &routes::proxy_image_url(image));
            let _ = img.set_attribute("loading", "lazy");
            let _ = card.append_child(&img);
        }

        let heading = dom::create(doc, "h3", "font-bold truncate", Some(&item.anime_title))?;
        let label = match item.episode.title.as_deref() {
            Some(title) if !title.is_empty() => format!("Episode {number} · {title}"),
            _ => format!("Episode {number}"),
        };
        let label = dom::create(doc, "p", "text-sm", Some(&label))?;
        let _ = card.append_child(&heading);
        let _ = card.append_child(&label);
        if let Some(duration) = item.episode.duration.as_deref() {
            let duration = dom::create(doc, "p", "text-xs", Some(duration))?;
            let _ = card.append_child(&duration);
        }

        let icon = dom::create(doc, "button", "watched-icon absolute top-2 right-2 p-2", Some("✓"))?;
        dom::set_data(&icon, "anime-session-id", &item.anime_session_id);
        dom::set_data(&icon, "episode-session-id", &item.episode.session);
        let _ = card.append_child(&icon);
        let _ = self.list.append_child(&card);

        Some((
            item.anime_session_id.clone(),
            item.episode.session.clone(),
            WatchedIcon(icon),
        ))
    }

    fn render_pagination(&self, page: usize, total_pages: usize) {
        if total_pages <= 1 {
            return;
        }
        let doc = &self.document;
        let append_button = |label: &str, target: usize, enabled: bool| {
            if let Some(button) = dom::create(doc, "button", "cw-page px-3 py-1", Some(label)) {
                dom::set_data(&button, "cw-page", &target.to_string());
                if !enabled {
                    let _ = button.set_attribute("disabled", "");
                }
                let _ = self.pagination.append_child(&button);
            }
        };
        append_button("Previous", page.saturating_sub(1), page > 1);
        if let Some(label) = dom::create(
            doc,
            "span",
            "px-3",
            Some(&format!("Page {page} of {total_pages}")),
        ) {
            let _ = self.pagination.append_child(&label);
        }
        append_button("Next", page + 1, page < total_pages);
    }
}
