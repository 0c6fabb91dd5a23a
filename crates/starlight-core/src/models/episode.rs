use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Episode number as reported by the backend.
///
/// Mostly whole numbers, but recap and special episodes use fractions
/// (`12.5`), and some responses send the number as a string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EpisodeNumber(pub f64);

impl EpisodeNumber {
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl<'de> Deserialize<'de> for EpisodeNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid episode number: {s}"))),
        }
    }
}

/// One episode entry from `/api/anime-episodes/{anime}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub session: String,
    pub episode: EpisodeNumber,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub snapshot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default = "first_page")]
    pub last_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: None,
            last_page: first_page(),
        }
    }
}

fn first_page() -> u32 {
    1
}

/// One page of the episode listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodePage {
    #[serde(default)]
    pub episodes: Vec<Episode>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub href: String,
    pub text: String,
}

/// Body of `/api/episode-downloads/{anime}/{episode}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadsResponse {
    #[serde(default)]
    pub downloads: Vec<DownloadLink>,
    #[serde(default)]
    pub error: Option<String>,
}

/// An episode the user has not watched yet, tagged with its parent anime.
#[derive(Debug, Clone, PartialEq)]
pub struct UnwatchedEpisode {
    pub anime_session_id: String,
    pub anime_title: String,
    pub anime_poster: String,
    pub episode: Episode,
}

/// The episode a card click refers to, read from the card's data attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSelection {
    pub anime_session_id: String,
    pub anime_title: String,
    pub episode_session_id: String,
    pub episode_number: String,
}

impl EpisodeSelection {
    /// All four attributes are required; blank values count as missing.
    pub fn from_parts(
        anime_session_id: Option<String>,
        anime_title: Option<String>,
        episode_session_id: Option<String>,
        episode_number: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|v| !v.trim().is_empty());
        Some(Self {
            anime_session_id: present(anime_session_id)?,
            anime_title: present(anime_title)?,
            episode_session_id: present(episode_session_id)?,
            episode_number: present(episode_number)?,
        })
    }

    /// "Episode 12", used as the download modal title.
    pub fn episode_label(&self) -> String {
        format!("Episode {}", self.episode_number)
    }

    /// "Frieren - Episode 12", used as the options modal title.
    pub fn options_title(&self) -> String {
        format!("{} - {}", self.anime_title, self.episode_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_episode_page() {
        let json = r#"{
            "episodes": [
                {
                    "session": "ep-1",
                    "episode": 1,
                    "title": null,
                    "duration": "00:23:40",
                    "snapshot": "https://i.animepahe.ru/snapshots/1.jpg"
                },
                {
                    "session": "ep-2",
                    "episode": "2",
                    "duration": "00:23:40",
                    "snapshot": "https://i.animepahe.ru/snapshots/2.jpg"
                }
            ],
            "pagination": {"current_page": 1, "last_page": 3}
        }"#;
        let page: EpisodePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.episodes.len(), 2);
        assert_eq!(page.episodes[1].episode, EpisodeNumber(2.0));
        assert!(page.episodes[0].title.is_none());
        assert_eq!(page.pagination.last_page, 3);
        assert!(page.error.is_none());
    }

    #[test]
    fn test_deserialize_error_page() {
        let page: EpisodePage = serde_json::from_str(r#"{"error": "upstream down"}"#).unwrap();
        assert!(page.episodes.is_empty());
        assert_eq!(page.pagination.last_page, 1);
        assert_eq!(page.error.as_deref(), Some("upstream down"));
    }

    #[test]
    fn test_episode_number_display() {
        assert_eq!(EpisodeNumber(12.0).to_string(), "12");
        assert_eq!(EpisodeNumber(12.5).to_string(), "12.5");
    }

    #[test]
    fn test_episode_number_rejects_garbage() {
        let result: Result<EpisodeNumber, _> = serde_json::from_str(r#""twelve""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_selection_requires_all_parts() {
        let selection = EpisodeSelection::from_parts(
            Some("a".into()),
            Some("Frieren".into()),
            Some("e".into()),
            Some("12".into()),
        )
        .unwrap();
        assert_eq!(selection.options_title(), "Frieren - Episode 12");
        assert_eq!(selection.episode_label(), "Episode 12");

        let missing_title =
            EpisodeSelection::from_parts(Some("a".into()), None, Some("e".into()), Some("1".into()));
        assert!(missing_title.is_none());
        let blank_episode = EpisodeSelection::from_parts(
            Some("a".into()),
            Some("T".into()),
            Some(" ".into()),
            Some("1".into()),
        );
        assert!(blank_episode.is_none());
    }

    #[test]
    fn test_deserialize_downloads() {
        let json = r#"{"downloads": [{"href": "https://kwik.si/f/abc", "text": "SubsPlease · 1080p"}]}"#;
        let resp: DownloadsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.downloads.len(), 1);
        assert_eq!(resp.downloads[0].text, "SubsPlease · 1080p");
    }
}
