//! On-demand download links for one episode.

use crate::api::StarlightApi;
use crate::modal::Modal;
use crate::view::{Delay, DownloadView, ModalView};

pub const DOWNLOAD_ERROR_MESSAGE: &str =
    "Failed to load download links. Please check your connection or try again later.";

/// What the download modal ended up showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Links(usize),
    Empty,
    Failed,
}

/// Reset the download modal, open it and fill it with the episode's links.
///
/// The request is issued while the modal is still running its open
/// transition. A response arriving after the modal was closed still
/// populates the hidden container.
pub async fn show_downloads<A, V, D>(
    api: &A,
    modal: &Modal<V, D>,
    anime_session: &str,
    episode_session: &str,
    title: &str,
) -> DownloadOutcome
where
    A: StarlightApi,
    V: ModalView + DownloadView,
    D: Delay,
{
    let view = modal.view();
    view.set_title(&format!("{title} - Download Options"));
    view.show_loading();

    let (_, result) = futures::join!(
        modal.open(),
        api.episode_downloads(anime_session, episode_session)
    );

    match result {
        Ok(links) if links.is_empty() => {
            view.show_empty();
            DownloadOutcome::Empty
        }
        Ok(links) => {
            view.show_links(&links);
            DownloadOutcome::Links(links.len())
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                anime = anime_session,
                episode = episode_session,
                "Failed to fetch download links"
            );
            view.show_error(DOWNLOAD_ERROR_MESSAGE);
            DownloadOutcome::Failed
        }
    }
}
