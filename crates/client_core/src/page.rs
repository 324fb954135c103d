use tracing::warn;

use crate::{
    modal::ModalController,
    preview::{PreviewController, EMBED_INPUT_ID, EXTRACT_INPUT_ID},
    reader::{ReadOutcome, ReadTicket, SelectedFile},
    view::BodyState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click { target_id: String },
    KeyDown { key: String },
    FilesChanged {
        input_id: String,
        files: Vec<SelectedFile>,
    },
}

/// What a dispatched event did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUpdate {
    Unchanged,
    ModalClosed,
    PreviewCleared,
    ReadIssued(ReadTicket),
}

/// All view state of the page, owned in one place.
#[derive(Debug, Clone)]
pub struct PageState {
    pub body: BodyState,
    pub modal: ModalController,
    pub embed_preview: PreviewController,
    pub extract_preview: PreviewController,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            body: BodyState::default(),
            modal: ModalController::default(),
            embed_preview: PreviewController::new(EMBED_INPUT_ID),
            extract_preview: PreviewController::new(EXTRACT_INPUT_ID),
        }
    }
}

impl PageState {
    pub fn open_modal(&mut self) {
        self.modal.open(&mut self.body);
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.close(&mut self.body)
    }

    pub fn preview(&self, input_id: &str) -> Option<&PreviewController> {
        [&self.embed_preview, &self.extract_preview]
            .into_iter()
            .find(|preview| preview.input_id() == input_id)
    }

    fn preview_mut(&mut self, input_id: &str) -> Option<&mut PreviewController> {
        [&mut self.embed_preview, &mut self.extract_preview]
            .into_iter()
            .find(|preview| preview.input_id() == input_id)
    }

    pub fn dispatch(&mut self, event: PageEvent) -> PageUpdate {
        match event {
            PageEvent::Click { target_id } => {
                if self.modal.handle_click(&target_id, &mut self.body) {
                    PageUpdate::ModalClosed
                } else {
                    PageUpdate::Unchanged
                }
            }
            PageEvent::KeyDown { key } => {
                if self.modal.handle_key(&key, &mut self.body) {
                    PageUpdate::ModalClosed
                } else {
                    PageUpdate::Unchanged
                }
            }
            PageEvent::FilesChanged { input_id, files } => {
                let Some(preview) = self.preview_mut(&input_id) else {
                    warn!(input = %input_id, "change event for unknown input");
                    return PageUpdate::Unchanged;
                };
                match preview.on_change(&files) {
                    Some(ticket) => PageUpdate::ReadIssued(ticket),
                    None => PageUpdate::PreviewCleared,
                }
            }
        }
    }

    /// Routes a finished read to its preview. Returns whether it was applied.
    pub fn complete_read(&mut self, outcome: ReadOutcome) -> bool {
        match self.preview_mut(&outcome.input_id) {
            Some(preview) => preview.complete(outcome),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
