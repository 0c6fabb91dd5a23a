//! Everything a page handler needs, built once at startup.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use starlight_api::StarlightClient;
use starlight_core::bookmarks;
use starlight_core::config::SiteConfig;
use starlight_core::continue_watching::{self, ContinueWatching};
use starlight_core::modal::Modal;
use starlight_core::navbar::{MenuLayout, MobileMenu, NavbarChange, NavbarScroll};
use starlight_core::store::PreferenceStore;
use starlight_core::view::ToggleIcon;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::dom::{self, TimeoutDelay};
use crate::storage::BrowserStore;
use crate::views::{
    BookmarkIcon, BookmarksPage, ContinueWatchingSection, DownloadModal, OptionsModal,
    WatchedIcon,
};

const NAVBAR_HIDDEN: &[&str] = &["-translate-y-full", "opacity-0"];

pub type Shared = Rc<PageContext>;

pub struct Navbar {
    pub element: Element,
    pub scroll: RefCell<NavbarScroll>,
}

pub struct Menu {
    pub toggle: Element,
    pub links: Element,
    pub state: RefCell<MobileMenu>,
}

pub struct ContinueWatchingPanel {
    pub section: ContinueWatchingSection,
    pub state: RefCell<ContinueWatching>,
    pub loading: Cell<bool>,
}

pub struct PageContext {
    pub config: SiteConfig,
    pub window: Window,
    pub document: Document,
    pub store: PreferenceStore<BrowserStore>,
    pub api: StarlightClient,
    pub navbar: Option<Navbar>,
    pub menu: Option<Menu>,
    pub options: Option<Modal<OptionsModal, TimeoutDelay>>,
    pub downloads: Option<Modal<DownloadModal, TimeoutDelay>>,
    pub bookmarks_page: Option<BookmarksPage>,
    pub continue_watching: Option<ContinueWatchingPanel>,
}

impl PageContext {
    /// Look up every optional page part. Returns `None` outside a browser.
    pub fn new(config: SiteConfig) -> Option<Shared> {
        let window = web_sys::window()?;
        let document = window.document()?;

        let base_url = if config.api.base_url.is_empty() {
            window.location().origin().unwrap_or_default()
        } else {
            config.api.base_url.clone()
        };
        let api = StarlightClient::new(base_url);
        let store = PreferenceStore::new(BrowserStore::open(), &config.storage);

        let navbar = dom::by_id(&document, "navbar").map(|element| {
            let height = element
                .dyn_ref::<HtmlElement>()
                .map(|el| f64::from(el.offset_height()))
                .unwrap_or_default();
            Navbar {
                element,
                scroll: RefCell::new(NavbarScroll::new(height)),
            }
        });
        let menu = match (
            dom::by_id(&document, "menu-toggle"),
            dom::by_id(&document, "nav-links"),
        ) {
            (Some(toggle), Some(links)) => Some(Menu {
                toggle,
                links,
                state: RefCell::new(MobileMenu::new(config.navbar.desktop_breakpoint)),
            }),
            _ => None,
        };

        let options = OptionsModal::find(&document)
            .map(|view| Modal::new(view, TimeoutDelay, &config.modal));
        let downloads = DownloadModal::find(&document)
            .map(|view| Modal::new(view, TimeoutDelay, &config.modal));
        let bookmarks_page = BookmarksPage::find(&document);
        let continue_watching =
            ContinueWatchingSection::find(&document).map(|section| ContinueWatchingPanel {
                section,
                state: RefCell::new(ContinueWatching::new(config.continue_watching.page_size)),
                loading: Cell::new(false),
            });

        tracing::debug!(
            navbar = navbar.is_some(),
            options_modal = options.is_some(),
            download_modal = downloads.is_some(),
            bookmarks_page = bookmarks_page.is_some(),
            continue_watching = continue_watching.is_some(),
            "Page context ready"
        );

        Some(Rc::new(Self {
            config,
            window,
            document,
            store,
            api,
            navbar,
            menu,
            options,
            downloads,
            bookmarks_page,
            continue_watching,
        }))
    }

    // ── Navbar ──────────────────────────────────────────────────

    pub fn on_scroll(&self) {
        let Some(navbar) = &self.navbar else {
            return;
        };
        let offset = self.window.scroll_y().unwrap_or_default();
        match navbar.scroll.borrow_mut().on_scroll(offset) {
            NavbarChange::Hide => dom::add_classes(&navbar.element, NAVBAR_HIDDEN),
            NavbarChange::Show => dom::remove_classes(&navbar.element, NAVBAR_HIDDEN),
            NavbarChange::Keep => {}
        }
    }

    pub fn on_menu_toggle(&self) {
        if let Some(menu) = &self.menu {
            let layout = menu.state.borrow_mut().toggle();
            apply_menu_layout(&menu.links, layout);
        }
    }

    pub fn on_resize(&self) {
        let Some(menu) = &self.menu else {
            return;
        };
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or_default();
        let layout = menu.state.borrow_mut().on_resize(width.max(0.0) as u32);
        apply_menu_layout(&menu.links, layout);
    }

    // ── Icons ───────────────────────────────────────────────────

    pub fn render_bookmark_icons(&self) {
        for el in dom::query_all(&self.document, ".bookmark-icon") {
            if let Some(id) = dom::data(&el, "session-id") {
                bookmarks::render_icon(&self.store, &id, &BookmarkIcon(el));
            }
        }
    }

    /// Watched icons currently on the page for one anime, keyed by episode.
    pub fn watched_icons_for(&self, anime: &str) -> Vec<(String, WatchedIcon)> {
        dom::query_all(&self.document, ".watched-icon")
            .into_iter()
            .filter(|el| dom::data(el, "anime-session-id").as_deref() == Some(anime))
            .filter_map(|el| Some((dom::data(&el, "episode-session-id")?, WatchedIcon(el))))
            .collect()
    }

    pub fn render_watched_icons(&self) {
        for el in dom::query_all(&self.document, ".watched-icon") {
            let (Some(anime), Some(episode)) = (
                dom::data(&el, "anime-session-id"),
                dom::data(&el, "episode-session-id"),
            ) else {
                continue;
            };
            WatchedIcon(el).render(self.store.is_watched(&anime, &episode));
        }
    }

    // ── Bookmarks page ──────────────────────────────────────────

    pub fn render_bookmarks_page(&self) {
        let Some(page) = &self.bookmarks_page else {
            return;
        };
        let saved = self.store.bookmarks();
        tracing::debug!(count = saved.len(), "Rendering bookmarks page");
        for (id, icon) in page.render(&saved) {
            bookmarks::render_icon(&self.store, &id, &icon);
        }
    }

    // ── Continue watching ───────────────────────────────────────

    /// Fetch (first load or after a reset) and render the section.
    pub async fn load_continue_watching(self: Rc<Self>) {
        let Some(panel) = &self.continue_watching else {
            return;
        };
        if panel.loading.get() {
            return;
        }
        if panel.state.borrow().needs_fetch() {
            panel.loading.set(true);
            self.render_continue_watching();

            let saved = self.store.bookmarks();
            let watched = self.store.watched();
            let aggregation = continue_watching::aggregate(&self.api, &saved, &watched).await;
            tracing::info!(
                bookmarks = aggregation.bookmark_count,
                episodes = aggregation.episodes.len(),
                failures = aggregation.failures.len(),
                "Continue watching loaded"
            );

            let watched_now = self.store.watched();
            panel.state.borrow_mut().replace(aggregation, &watched_now);
            panel.loading.set(false);
        }
        self.render_continue_watching();
    }

    pub fn refresh_continue_watching(self: Rc<Self>) {
        if let Some(panel) = &self.continue_watching {
            if panel.loading.get() {
                return;
            }
            panel.state.borrow_mut().reset();
        }
        wasm_bindgen_futures::spawn_local(self.load_continue_watching());
    }

    pub fn set_continue_watching_page(&self, page: usize) {
        if let Some(panel) = &self.continue_watching {
            panel.state.borrow_mut().set_page(page);
            self.render_continue_watching();
        }
    }

    /// Drop newly watched episodes from the loaded list and redraw.
    pub fn sync_continue_watching(&self) {
        let Some(panel) = &self.continue_watching else {
            return;
        };
        let watched = self.store.watched();
        if panel.state.borrow_mut().apply_watched(&watched) {
            self.render_continue_watching();
        }
    }

    pub fn render_continue_watching(&self) {
        let Some(panel) = &self.continue_watching else {
            return;
        };
        let icons = panel.section.render(&panel.state.borrow());
        for (anime, episode, icon) in icons {
            icon.render(self.store.is_watched(&anime, &episode));
        }
    }
}

fn apply_menu_layout(links: &Element, layout: MenuLayout) {
    match layout {
        MenuLayout::Desktop => dom::remove_classes(links, &[dom::HIDDEN, "flex"]),
        MenuLayout::Expanded => {
            dom::remove_classes(links, &[dom::HIDDEN]);
            dom::add_classes(links, &["flex"]);
        }
        MenuLayout::Collapsed => {
            dom::remove_classes(links, &["flex"]);
            dom::add_classes(links, &[dom::HIDDEN]);
        }
    }
}
