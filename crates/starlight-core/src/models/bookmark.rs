use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_TYPE: &str = "Unknown Type";
const UNKNOWN_YEAR: &str = "N/A";

/// A bookmarked anime as persisted in local storage.
///
/// Field names match the JSON written by earlier versions of the site so
/// existing bookmark lists keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub media_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub year: String,
}

impl BookmarkRecord {
    /// Year for display, `N/A` when unknown.
    pub fn display_year(&self) -> &str {
        if self.year.is_empty() {
            UNKNOWN_YEAR
        } else {
            &self.year
        }
    }
}

/// Data attributes carried by a bookmark button, read once per click.
#[derive(Debug, Clone, Default)]
pub struct BookmarkAttributes {
    pub session_id: Option<String>,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub media_type: Option<String>,
    pub year: Option<String>,
    pub aired: Option<String>,
}

impl BookmarkAttributes {
    /// Build the record to persist. Returns `None` without a session id.
    pub fn into_record(self) -> Option<BookmarkRecord> {
        let session_id = non_empty(self.session_id)?;
        let year = match non_empty(self.aired) {
            Some(aired) => RE_YEAR
                .find(&aired)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
            None => non_empty(self.year).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        };
        Some(BookmarkRecord {
            session_id,
            title: non_empty(self.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            poster: self.poster.unwrap_or_default(),
            media_type: non_empty(self.media_type).unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            year,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
