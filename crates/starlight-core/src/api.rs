//! Backend endpoints consumed by the behavior layer.

use std::future::Future;

use crate::models::{DownloadLink, Episode, EpisodePage};

/// The two JSON endpoints served by the site backend.
///
/// Futures are not required to be `Send`: in the browser everything runs on
/// the page's event loop.
pub trait StarlightApi {
    type Error: std::error::Error + 'static;

    /// One page of an anime's episode list. A body carrying an `error`
    /// field must be reported as `Err`.
    fn episode_page(
        &self,
        anime_session: &str,
        page: u32,
    ) -> impl Future<Output = Result<EpisodePage, Self::Error>>;

    /// Download links for a single episode.
    fn episode_downloads(
        &self,
        anime_session: &str,
        episode_session: &str,
    ) -> impl Future<Output = Result<Vec<DownloadLink>, Self::Error>>;
}

/// Fetch every page of an anime's episode list, one request at a time.
pub async fn fetch_all_episodes<A: StarlightApi>(
    api: &A,
    anime_session: &str,
) -> Result<Vec<Episode>, A::Error> {
    let mut episodes = Vec::new();
    let mut page = 1;

    loop {
        let resp = api.episode_page(anime_session, page).await?;
        let last_page = resp.pagination.last_page;
        episodes.extend(resp.episodes);

        if page >= last_page {
            break;
        }
        page += 1;
    }

    tracing::debug!(
        anime = anime_session,
        pages = page,
        episodes = episodes.len(),
        "Fetched episode list"
    );
    Ok(episodes)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::testing::{episode, FakeApi};

    #[test]
    fn test_fetches_pages_in_order() {
        let api = FakeApi::default().with_pages(
            "a",
            vec![vec![episode("a1", 1.0)], vec![episode("a2", 2.0)], vec![episode("a3", 3.0)]],
        );
        let episodes = block_on(fetch_all_episodes(&api, "a")).unwrap();
        let ids: Vec<_> = episodes.iter().map(|e| e.session.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "a3"]);
        assert_eq!(api.calls(), [("a".to_string(), 1), ("a".into(), 2), ("a".into(), 3)]);
    }

    #[test]
    fn test_stops_on_failing_page() {
        let api = FakeApi::default()
            .with_pages("a", vec![vec![episode("a1", 1.0)], vec![episode("a2", 2.0)]])
            .failing_at("a", 2);
        assert!(block_on(fetch_all_episodes(&api, "a")).is_err());
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn test_zero_last_page_fetches_once() {
        let api = FakeApi::default().with_raw_page(
            "a",
            EpisodePage {
                episodes: vec![episode("a1", 1.0)],
                pagination: crate::models::Pagination {
                    current_page: Some(1),
                    last_page: 0,
                },
                error: None,
            },
        );
        let episodes = block_on(fetch_all_episodes(&api, "a")).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(api.calls().len(), 1);
    }
}
