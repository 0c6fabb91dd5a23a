//! Seams between the behavior layer and whatever draws it.

use std::future::Future;
use std::time::Duration;

use crate::models::DownloadLink;

/// An icon with an on/off state (bookmark, watched).
pub trait ToggleIcon {
    fn render(&self, active: bool);
}

/// The presentational side of a modal dialog.
pub trait ModalView {
    /// Make the modal part of the layout.
    fn show(&self);
    /// Remove the modal from the layout.
    fn hide(&self);
    /// Toggle the class that drives the enter/leave transition.
    fn set_active(&self, active: bool);
    /// Clear transient content after the modal has been hidden.
    fn reset(&self);
}

/// Content area of the download-links modal.
pub trait DownloadView {
    fn set_title(&self, title: &str);
    fn show_loading(&self);
    fn show_links(&self, links: &[DownloadLink]);
    fn show_empty(&self);
    fn show_error(&self, message: &str);
}

/// A timer the modal waits on between its two phases.
pub trait Delay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Resolves immediately. Used off-browser and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}
