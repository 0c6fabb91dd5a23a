//! Event wiring. One delegated document click handler plus a few direct
//! listeners on fixed elements.

use std::rc::Rc;

use starlight_core::downloads::{self, DownloadOutcome};
use starlight_core::modal::{ClickTarget, Modal};
use starlight_core::models::{BookmarkAttributes, EpisodeSelection};
use starlight_core::view::{Delay, ModalView};
use starlight_core::{bookmarks, watched};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event};

use crate::context::Shared;
use crate::dom;
use crate::views::{BookmarkIcon, ModalRootElement, WatchedIcon};

const CARD_SELECTOR: &str =
    ".anime-card[data-anime-session-id], .episode-card[data-anime-session-id]";
const MARK_ALL_FAILED: &str = "Could not load every episode, nothing was marked. Please try again.";

/// Attach all listeners and render the initial page state.
pub fn install(ctx: &Shared) {
    if ctx.navbar.is_some() {
        let c = ctx.clone();
        dom::listen(&ctx.window, "scroll", move |_| c.on_scroll());
    }
    if let Some(menu) = &ctx.menu {
        let c = ctx.clone();
        dom::listen(&menu.toggle, "click", move |_| c.on_menu_toggle());
    }
    let c = ctx.clone();
    dom::listen(&ctx.window, "resize", move |_| c.on_resize());
    ctx.on_resize();

    let c = ctx.clone();
    dom::listen(&ctx.document, "click", move |event| on_document_click(&c, &event));

    if let Some(modal) = &ctx.options {
        install_modal(ctx, modal, |ctx| ctx.options.as_ref());
        if let Some(button) = dom::by_id(&ctx.document, "downloadEpisodeBtn") {
            let c = ctx.clone();
            dom::listen(&button, "click", move |event| {
                event.prevent_default();
                download_selected(&c);
            });
        }
    }
    if let Some(modal) = &ctx.downloads {
        install_modal(ctx, modal, |ctx| ctx.downloads.as_ref());
    }

    ctx.render_bookmark_icons();
    ctx.render_watched_icons();
    ctx.render_bookmarks_page();
    if ctx.continue_watching.is_some() {
        spawn_local(ctx.clone().load_continue_watching());
    }
}

/// Close button and backdrop click for one modal. `pick` re-borrows the
/// modal from the context inside the `'static` listener.
fn install_modal<V, D>(
    ctx: &Shared,
    modal: &Modal<V, D>,
    pick: fn(&Shared) -> Option<&Modal<V, D>>,
) where
    V: ModalView + ModalRootElement + 'static,
    D: Delay + 'static,
{
    let root = modal.view().root_element().clone();

    if let Ok(Some(close)) = root.query_selector("button") {
        let c = ctx.clone();
        dom::listen(&close, "click", move |_| {
            let c = c.clone();
            spawn_local(async move {
                if let Some(modal) = pick(&c) {
                    modal.close().await;
                }
            });
        });
    }

    let c = ctx.clone();
    let backdrop = root.clone();
    dom::listen(&root, "click", move |event| {
        let target = if dom::targets(&event, &backdrop) {
            ClickTarget::Backdrop
        } else {
            ClickTarget::Content
        };
        let c = c.clone();
        spawn_local(async move {
            if let Some(modal) = pick(&c) {
                modal.handle_click(target).await;
            }
        });
    });
}

// ── Document click delegation ───────────────────────────────────

fn on_document_click(ctx: &Shared, event: &Event) {
    if let Some(icon) = dom::closest(event, ".bookmark-icon") {
        event.stop_propagation();
        event.prevent_default();
        on_bookmark_click(ctx, icon);
        return;
    }
    if let Some(icon) = dom::closest(event, ".watched-icon") {
        event.stop_propagation();
        event.prevent_default();
        on_watched_click(ctx, icon);
        return;
    }
    if let Some(button) = dom::closest(event, ".mark-all-watched") {
        event.prevent_default();
        if let Some(anime) = dom::data(&button, "anime-session-id") {
            mark_all(ctx, anime);
        }
        return;
    }
    if let Some(button) = dom::closest(event, ".unmark-all-watched") {
        event.prevent_default();
        if let Some(anime) = dom::data(&button, "anime-session-id") {
            let icons = ctx.watched_icons_for(&anime);
            watched::unmark_all_watched(&ctx.store, &anime, &icons);
        }
        return;
    }
    if let Some(button) = dom::closest(event, "[data-cw-page]") {
        if let Some(page) = dom::data(&button, "cw-page").and_then(|p| p.parse().ok()) {
            ctx.set_continue_watching_page(page);
        }
        return;
    }
    if dom::closest(event, "#continue-watching-refresh").is_some() {
        ctx.clone().refresh_continue_watching();
        return;
    }
    if let Some(card) = dom::closest(event, CARD_SELECTOR) {
        on_card_click(ctx, &card);
    }
}

fn on_bookmark_click(ctx: &Shared, icon: Element) {
    let attributes = BookmarkAttributes {
        session_id: dom::data(&icon, "session-id"),
        title: dom::data(&icon, "anime-title"),
        poster: dom::data(&icon, "poster"),
        media_type: dom::data(&icon, "type"),
        year: dom::data(&icon, "year"),
        aired: dom::data(&icon, "aired"),
    };
    let Some(record) = attributes.into_record() else {
        tracing::warn!("Bookmark icon without a session id");
        return;
    };
    bookmarks::toggle(&ctx.store, record, &BookmarkIcon(icon));
}

fn on_watched_click(ctx: &Shared, icon: Element) {
    let (Some(anime), Some(episode)) = (
        dom::data(&icon, "anime-session-id"),
        dom::data(&icon, "episode-session-id"),
    ) else {
        tracing::warn!("Watched icon without session ids");
        return;
    };
    watched::toggle(&ctx.store, &anime, &episode, &WatchedIcon(icon));
    ctx.sync_continue_watching();
}

fn mark_all(ctx: &Shared, anime: String) {
    let ctx = Rc::clone(ctx);
    spawn_local(async move {
        let icons = ctx.watched_icons_for(&anime);
        match watched::mark_all_watched(&ctx.store, &ctx.api, &anime, &icons).await {
            Ok(_) => ctx.sync_continue_watching(),
            Err(e) => {
                tracing::error!(error = %e, anime = %anime, "Mark all watched failed");
                dom::alert(MARK_ALL_FAILED);
            }
        }
    });
}

// ── Episode options & downloads ─────────────────────────────────

fn on_card_click(ctx: &Shared, card: &Element) {
    let Some(selection) = EpisodeSelection::from_parts(
        dom::data(card, "anime-session-id"),
        dom::data(card, "anime-title"),
        dom::data(card, "episode-session-id"),
        dom::data(card, "episode-number"),
    ) else {
        tracing::error!("Missing data for episode options, not opening modal");
        return;
    };

    match &ctx.options {
        Some(modal) => {
            modal.view().select(selection);
            let ctx = ctx.clone();
            spawn_local(async move {
                if let Some(modal) = &ctx.options {
                    modal.open().await;
                }
            });
        }
        None => show_downloads(ctx, selection),
    }
}

fn download_selected(ctx: &Shared) {
    let Some(selection) = ctx.options.as_ref().and_then(|m| m.view().selection()) else {
        tracing::warn!("Download requested without a selected episode");
        return;
    };
    let c = ctx.clone();
    spawn_local(async move {
        if let Some(modal) = &c.options {
            modal.close().await;
        }
    });
    show_downloads(ctx, selection);
}

fn show_downloads(ctx: &Shared, selection: EpisodeSelection) {
    if ctx.downloads.is_none() {
        tracing::error!("Download modal elements not found");
        return;
    }
    let ctx = ctx.clone();
    spawn_local(async move {
        let Some(modal) = &ctx.downloads else {
            return;
        };
        let outcome = downloads::show_downloads(
            &ctx.api,
            modal,
            &selection.anime_session_id,
            &selection.episode_session_id,
            &selection.episode_label(),
        )
        .await;
        if let DownloadOutcome::Links(count) = outcome {
            tracing::debug!(count, episode = %selection.episode_session_id, "Download links shown");
        }
    });
}
