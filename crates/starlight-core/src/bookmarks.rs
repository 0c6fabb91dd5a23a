//! Bookmark toggling.

use crate::models::BookmarkRecord;
use crate::store::{KeyValueStore, PreferenceStore};
use crate::view::ToggleIcon;

/// Tooltip for a bookmark icon in the given state.
pub fn tooltip(bookmarked: bool) -> &'static str {
    if bookmarked {
        "Remove from Bookmarks"
    } else {
        "Add to Bookmarks"
    }
}

/// Add the record if it is not bookmarked, remove it otherwise.
///
/// The icon is re-rendered from the stored state afterwards, so a failed
/// write leaves it showing what is actually persisted. Returns that state.
pub fn toggle<S: KeyValueStore>(
    store: &PreferenceStore<S>,
    record: BookmarkRecord,
    icon: &impl ToggleIcon,
) -> bool {
    let session_id = record.session_id.clone();
    let mut bookmarks = store.bookmarks();

    match bookmarks.iter().position(|b| b.session_id == session_id) {
        Some(index) => {
            bookmarks.remove(index);
            tracing::info!(session_id = %session_id, "Bookmark removed");
        }
        None => {
            tracing::info!(title = %record.title, poster = %record.poster, "Bookmark added");
            bookmarks.push(record);
        }
    }
    store.save_bookmarks(&bookmarks);

    render_icon(store, &session_id, icon)
}

/// Render an icon from the stored state. Returns that state.
pub fn render_icon<S: KeyValueStore>(
    store: &PreferenceStore<S>,
    session_id: &str,
    icon: &impl ToggleIcon,
) -> bool {
    let bookmarked = store.is_bookmarked(session_id);
    icon.render(bookmarked);
    bookmarked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::MemoryStore;
    use crate::testing::{record, FailingStore, RecordingIcon};

    fn store() -> PreferenceStore<MemoryStore> {
        PreferenceStore::new(MemoryStore::new(), &SiteConfig::default().storage)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = store();
        let icon = RecordingIcon::default();

        assert!(toggle(&store, record("a", "Alpha"), &icon));
        assert_eq!(icon.state.get(), Some(true));
        assert!(store.is_bookmarked("a"));

        assert!(!toggle(&store, record("a", "Alpha"), &icon));
        assert_eq!(icon.state.get(), Some(false));
        assert!(!store.is_bookmarked("a"));
        assert_eq!(icon.renders.get(), 2);
    }

    #[test]
    fn test_round_trip_restores_store() {
        let store = store();
        let icon = RecordingIcon::default();
        toggle(&store, record("a", "Alpha"), &icon);
        toggle(&store, record("b", "Beta"), &icon);
        let before = store.bookmarks();

        toggle(&store, record("c", "Gamma"), &icon);
        toggle(&store, record("c", "Gamma"), &icon);
        assert_eq!(store.bookmarks(), before);
    }

    #[test]
    fn test_no_duplicates() {
        let store = store();
        let icon = RecordingIcon::default();
        toggle(&store, record("a", "Alpha"), &icon);
        toggle(&store, record("b", "Beta"), &icon);
        toggle(&store, record("a", "Alpha"), &icon);
        toggle(&store, record("a", "Alpha again"), &icon);
        let ids: Vec<_> = store.bookmarks().into_iter().map(|b| b.session_id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_failed_write_renders_persisted_state() {
        let store = PreferenceStore::new(FailingStore, &SiteConfig::default().storage);
        let icon = RecordingIcon::default();
        assert!(!toggle(&store, record("a", "Alpha"), &icon));
        assert_eq!(icon.state.get(), Some(false));
    }

    #[test]
    fn test_tooltip() {
        assert_eq!(tooltip(true), "Remove from Bookmarks");
        assert_eq!(tooltip(false), "Add to Bookmarks");
    }
}
