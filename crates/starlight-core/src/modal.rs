//! Two-phase modal open/close.
//!
//! Opening makes the modal part of the layout first and flips the active
//! class one tick later so the CSS transition has a starting frame. Closing
//! runs the same sequence in reverse and clears transient content once the
//! modal is hidden.

use std::cell::Cell;
use std::time::Duration;

use crate::config::ModalConfig;
use crate::view::{Delay, ModalView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Where a click inside the modal root landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The root element itself, i.e. the dimmed backdrop.
    Backdrop,
    /// Anything inside the dialog content.
    Content,
}

pub struct Modal<V, D> {
    view: V,
    delay: D,
    open_delay: Duration,
    close_delay: Duration,
    phase: Cell<ModalPhase>,
}

impl<V: ModalView, D: Delay> Modal<V, D> {
    pub fn new(view: V, delay: D, config: &ModalConfig) -> Self {
        Self {
            view,
            delay,
            open_delay: config.open_delay(),
            close_delay: config.close_delay(),
            phase: Cell::new(ModalPhase::Closed),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase.get()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase.get(), ModalPhase::Opening | ModalPhase::Open)
    }

    pub async fn open(&self) {
        self.view.show();
        self.phase.set(ModalPhase::Opening);
        self.delay.sleep(self.open_delay).await;
        // A close() issued during the delay wins.
        if self.phase.get() == ModalPhase::Opening {
            self.view.set_active(true);
            self.phase.set(ModalPhase::Open);
        }
    }

    pub async fn close(&self) {
        self.view.set_active(false);
        self.phase.set(ModalPhase::Closing);
        self.delay.sleep(self.close_delay).await;
        if self.phase.get() == ModalPhase::Closing {
            self.view.hide();
            self.view.reset();
            self.phase.set(ModalPhase::Closed);
        }
    }

    /// Close on backdrop clicks, ignore clicks on the content.
    pub async fn handle_click(&self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::config::SiteConfig;
    use crate::testing::{RecordingModal, YieldDelay};
    use crate::view::{DownloadView, NoDelay};

    fn modal() -> Modal<RecordingModal, NoDelay> {
        Modal::new(RecordingModal::default(), NoDelay, &SiteConfig::default().modal)
    }

    #[test]
    fn test_open_then_close_sequence() {
        let modal = modal();
        block_on(modal.open());
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert!(modal.view().visible.get());
        assert!(modal.view().active.get());

        block_on(modal.close());
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert_eq!(
            *modal.view().events.borrow(),
            ["show", "activate", "deactivate", "hide", "reset"]
        );
    }

    #[test]
    fn test_close_resets_content() {
        let modal = modal();
        block_on(modal.open());
        modal.view().show_error("boom");
        block_on(modal.close());
        assert!(modal.view().error.borrow().is_none());
        assert!(modal.view().loading.get());
    }

    #[test]
    fn test_backdrop_click_closes() {
        let modal = modal();
        block_on(modal.open());
        block_on(modal.handle_click(ClickTarget::Backdrop));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_content_click_keeps_open() {
        let modal = modal();
        block_on(modal.open());
        block_on(modal.handle_click(ClickTarget::Content));
        assert!(modal.is_open());
        assert!(modal.view().visible.get());
    }

    #[test]
    fn test_close_during_open_delay_wins() {
        let modal = Modal::new(
            RecordingModal::default(),
            YieldDelay,
            &SiteConfig::default().modal,
        );
        block_on(async { futures::join!(modal.open(), modal.close()) });
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(!modal.view().visible.get());
        assert_eq!(
            *modal.view().events.borrow(),
            ["show", "deactivate", "hide", "reset"]
        );
    }
}
