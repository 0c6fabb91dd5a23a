use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use starlight_core::api::StarlightApi;
use starlight_core::models::{DownloadLink, DownloadsResponse, EpisodePage};
use starlight_core::routes;

use crate::error::ApiError;

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `/api/anime-episodes` and `/api/episode-downloads`.
#[derive(Debug, Clone)]
pub struct StarlightClient {
    base_url: String,
    http: Client,
}

impl StarlightClient {
    /// `base_url` is the site origin, e.g. `https://starlight.example`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the HTTP response for errors, preferring the backend's own
    /// `{"error": ...}` message over the raw body.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        tracing::warn!(status, %message, "Backend API error");
        Err(ApiError::Api { status, message })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl StarlightApi for StarlightClient {
    type Error = ApiError;

    async fn episode_page(&self, anime_session: &str, page: u32) -> Result<EpisodePage, ApiError> {
        let resp: EpisodePage = self
            .get_json(&routes::anime_episodes_path(anime_session, page))
            .await?;
        match resp.error {
            Some(message) => Err(ApiError::Backend(message)),
            None => Ok(resp),
        }
    }

    async fn episode_downloads(
        &self,
        anime_session: &str,
        episode_session: &str,
    ) -> Result<Vec<DownloadLink>, ApiError> {
        let resp: DownloadsResponse = self
            .get_json(&routes::episode_downloads_path(anime_session, episode_session))
            .await?;
        match resp.error {
            Some(message) => Err(ApiError::Backend(message)),
            None => Ok(resp.downloads),
        }
    }
}
