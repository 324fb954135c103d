//! Information modal: open/close with body scroll locking.

use tracing::debug;

use crate::view::{BodyState, Overflow, Visibility};

pub const INFO_MODAL_ID: &str = "infoModal";
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalController {
    id: String,
    visibility: Visibility,
    saved_overflow: Option<Overflow>,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new(INFO_MODAL_ID)
    }
}

impl ModalController {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visibility: Visibility::Hidden,
            saved_overflow: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_shown()
    }

    /// Shows the modal and locks page scrolling. Opening an open modal keeps
    /// the overflow value saved by the first call.
    pub fn open(&mut self, body: &mut BodyState) {
        if self.is_open() {
            return;
        }
        self.saved_overflow = Some(body.overflow);
        body.overflow = Overflow::Hidden;
        self.visibility = Visibility::Shown;
        debug!(modal = %self.id, "modal opened");
    }

    /// Returns `false` when the modal was already closed.
    pub fn close(&mut self, body: &mut BodyState) -> bool {
        if !self.is_open() {
            return false;
        }
        body.overflow = self.saved_overflow.take().unwrap_or_default();
        self.visibility = Visibility::Hidden;
        debug!(modal = %self.id, overflow = body.overflow.as_css(), "modal closed");
        true
    }

    /// Clicks close the modal only when they land on the backdrop, which is
    /// the modal element itself rather than anything inside it.
    pub fn handle_click(&mut self, target_id: &str, body: &mut BodyState) -> bool {
        if target_id != self.id {
            return false;
        }
        self.close(body)
    }

    pub fn handle_key(&mut self, key: &str, body: &mut BodyState) -> bool {
        if key != ESCAPE_KEY {
            return false;
        }
        self.close(body)
    }
}

#[cfg(test)]
#[path = "tests/modal_tests.rs"]
mod tests;
