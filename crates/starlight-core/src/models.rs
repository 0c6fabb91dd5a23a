mod bookmark;
mod episode;
mod watched_map;

pub use bookmark::{BookmarkAttributes, BookmarkRecord};
pub use episode::{
    DownloadLink, DownloadsResponse, Episode, EpisodeNumber, EpisodePage, EpisodeSelection,
    Pagination, UnwatchedEpisode,
};
pub use watched_map::WatchedMap;
