//! Watched-episode toggling, single and bulk.

use crate::api::{fetch_all_episodes, StarlightApi};
use crate::store::{KeyValueStore, PreferenceStore};
use crate::view::ToggleIcon;

pub fn tooltip(watched: bool) -> &'static str {
    if watched {
        "Mark as unwatched"
    } else {
        "Mark as watched"
    }
}

/// Flip one episode's watched state and re-render its icon.
/// Returns the stored state afterwards.
pub fn toggle<S: KeyValueStore>(
    store: &PreferenceStore<S>,
    anime_session: &str,
    episode_session: &str,
    icon: &impl ToggleIcon,
) -> bool {
    let mut watched = store.watched();
    let now_watched = watched.toggle(anime_session, episode_session);
    store.save_watched(&watched);
    tracing::debug!(
        anime = anime_session,
        episode = episode_session,
        watched = now_watched,
        "Toggled watched state"
    );

    let stored = store.is_watched(anime_session, episode_session);
    icon.render(stored);
    stored
}

/// Mark every episode of an anime as watched.
///
/// All pages are fetched before anything is written, so a failed page
/// leaves the stored set untouched. On success the set is saved once and
/// the given `(episode_session, icon)` pairs are re-rendered. Returns how
/// many episodes were newly marked.
pub async fn mark_all_watched<S, A, I>(
    store: &PreferenceStore<S>,
    api: &A,
    anime_session: &str,
    icons: &[(String, I)],
) -> Result<usize, A::Error>
where
    S: KeyValueStore,
    A: StarlightApi,
    I: ToggleIcon,
{
    let episodes = fetch_all_episodes(api, anime_session).await?;

    // Re-read after the await: another handler may have written meanwhile.
    let mut watched = store.watched();
    let added = watched.insert_all(anime_session, episodes.into_iter().map(|e| e.session));
    store.save_watched(&watched);
    tracing::info!(anime = anime_session, added, "Marked all episodes watched");

    render_icons(store, anime_session, icons);
    Ok(added)
}

/// Forget every watched episode of an anime. No network involved.
pub fn unmark_all_watched<S: KeyValueStore, I: ToggleIcon>(
    store: &PreferenceStore<S>,
    anime_session: &str,
    icons: &[(String, I)],
) {
    let mut watched = store.watched();
    if watched.clear(anime_session) {
        store.save_watched(&watched);
        tracing::info!(anime = anime_session, "Cleared watched episodes");
    }
    render_icons(store, anime_session, icons);
}

/// Render each `(episode_session, icon)` pair from the stored state.
pub fn render_icons<S: KeyValueStore, I: ToggleIcon>(
    store: &PreferenceStore<S>,
    anime_session: &str,
    icons: &[(String, I)],
) {
    let watched = store.watched();
    for (episode_session, icon) in icons {
        icon.render(watched.contains(anime_session, episode_session));
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::config::SiteConfig;
    use crate::store::MemoryStore;
    use crate::testing::{episode, FakeApi, RecordingIcon};

    fn store() -> PreferenceStore<MemoryStore> {
        PreferenceStore::new(MemoryStore::new(), &SiteConfig::default().storage)
    }

    fn icons(ids: &[&str]) -> Vec<(String, RecordingIcon)> {
        ids.iter()
            .map(|id| (id.to_string(), RecordingIcon::default()))
            .collect()
    }

    fn three_episode_api() -> FakeApi {
        FakeApi::default().with_pages(
            "a",
            vec![vec![episode("e1", 1.0), episode("e2", 2.0)], vec![episode("e3", 3.0)]],
        )
    }

    #[test]
    fn test_toggle_twice_is_noop() {
        let store = store();
        let icon = RecordingIcon::default();
        store.save_watched(&{
            let mut w = crate::models::WatchedMap::new();
            w.toggle("b", "x");
            w
        });
        let before = store.watched();

        assert!(toggle(&store, "a", "e1", &icon));
        assert_eq!(icon.state.get(), Some(true));
        assert!(!toggle(&store, "a", "e1", &icon));
        assert_eq!(icon.state.get(), Some(false));
        assert_eq!(store.watched(), before);
    }

    #[test]
    fn test_mark_all_watched() {
        let store = store();
        let api = three_episode_api();
        let icons = icons(&["e1", "e3"]);

        let added = block_on(mark_all_watched(&store, &api, "a", &icons)).unwrap();
        assert_eq!(added, 3);
        for id in ["e1", "e2", "e3"] {
            assert!(store.is_watched("a", id));
        }
        assert!(icons.iter().all(|(_, icon)| icon.state.get() == Some(true)));
    }

    #[test]
    fn test_mark_all_watched_is_idempotent() {
        let store = store();
        let api = three_episode_api();
        let icons = icons(&[]);

        block_on(mark_all_watched(&store, &api, "a", &icons)).unwrap();
        let once = store.watched();
        let added = block_on(mark_all_watched(&store, &api, "a", &icons)).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.watched(), once);
    }

    #[test]
    fn test_mark_all_failure_leaves_state() {
        let store = store();
        let icon = RecordingIcon::default();
        toggle(&store, "a", "e1", &icon);
        let before = store.watched();

        let api = three_episode_api().failing_at("a", 2);
        let icons = icons(&["e2"]);
        assert!(block_on(mark_all_watched(&store, &api, "a", &icons)).is_err());
        assert_eq!(store.watched(), before);
        assert_eq!(icons[0].1.renders.get(), 0);
    }

    #[test]
    fn test_unmark_all() {
        let store = store();
        let api = three_episode_api();
        let icons = icons(&["e1", "e2"]);
        block_on(mark_all_watched(&store, &api, "a", &icons)).unwrap();
        toggle(&store, "b", "x", &RecordingIcon::default());

        unmark_all_watched(&store, "a", &icons);
        assert!(store.watched().episodes("a").is_none());
        assert!(store.is_watched("b", "x"));
        assert!(icons.iter().all(|(_, icon)| icon.state.get() == Some(false)));
    }
}
