//! URLs the behavior layer links to or requests.

use urlencoding::encode;

/// Anime detail page, carrying the title for display fallback.
pub fn anime_detail_url(anime_session: &str, title: &str) -> String {
    format!("/anime/{}?anime_title={}", encode(anime_session), encode(title))
}

/// Poster routed through the site's image proxy.
pub fn proxy_image_url(poster: &str) -> String {
    format!("/proxy-image?url={}", encode(poster))
}

pub fn episode_downloads_path(anime_session: &str, episode_session: &str) -> String {
    format!(
        "/api/episode-downloads/{}/{}",
        encode(anime_session),
        encode(episode_session)
    )
}

pub fn anime_episodes_path(anime_session: &str, page: u32) -> String {
    format!("/api/anime-episodes/{}?page={page}", encode(anime_session))
}
