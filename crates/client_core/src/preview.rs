//! Image preview for a file input.
//!
//! Selecting a file issues a [`ReadTicket`]; the read runs elsewhere and its
//! [`ReadOutcome`] is applied with [`PreviewController::complete`]. Every
//! change event bumps the controller's sequence number, so only the read for
//! the most recent selection can update the view.

use tracing::{debug, warn};

use crate::{
    reader::{ImageReader, PreviewError, ReadOutcome, ReadTicket, SelectedFile},
    view::Visibility,
};

pub const EMBED_INPUT_ID: &str = "embed-image";
pub const EXTRACT_INPUT_ID: &str = "extract-image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Embed,
    Extract,
}

impl InputKind {
    /// Any input other than the embed picker is treated as the extract one.
    pub fn from_input_id(input_id: &str) -> Self {
        if input_id == EMBED_INPUT_ID {
            InputKind::Embed
        } else {
            InputKind::Extract
        }
    }

    pub fn default_label(self) -> Label {
        match self {
            InputKind::Embed => Label::CHOOSE_IMAGE,
            InputKind::Extract => Label::CHOOSE_STEGO_IMAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub icon: &'static str,
    pub text: &'static str,
}

impl Label {
    pub const REPLACE_IMAGE: Label = Label {
        icon: "fa-exchange-alt",
        text: "Ganti Gambar",
    };
    pub const CHOOSE_IMAGE: Label = Label {
        icon: "fa-upload",
        text: "Pilih Gambar",
    };
    pub const CHOOSE_STEGO_IMAGE: Label = Label {
        icon: "fa-search",
        text: "Pilih Gambar Steganografi",
    };

    pub fn to_html(&self) -> String {
        format!("<i class=\"fas {} mr-2\"></i>{}", self.icon, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub source: Option<String>,
    pub preview: Visibility,
    pub placeholder: Visibility,
    pub label: Label,
}

impl PreviewView {
    pub fn empty(kind: InputKind) -> Self {
        Self {
            source: None,
            preview: Visibility::Hidden,
            placeholder: Visibility::Shown,
            label: kind.default_label(),
        }
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_shown() && self.source.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct PreviewController {
    input_id: String,
    kind: InputKind,
    view: PreviewView,
    seq: u64,
    pending: Option<u64>,
    last_error: Option<PreviewError>,
}

impl PreviewController {
    pub fn new(input_id: impl Into<String>) -> Self {
        let input_id = input_id.into();
        let kind = InputKind::from_input_id(&input_id);
        Self {
            input_id,
            kind,
            view: PreviewView::empty(kind),
            seq: 0,
            pending: None,
            last_error: None,
        }
    }

    pub fn input_id(&self) -> &str {
        &self.input_id
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn view(&self) -> &PreviewView {
        &self.view
    }

    pub fn last_error(&self) -> Option<&PreviewError> {
        self.last_error.as_ref()
    }

    pub fn is_reading(&self) -> bool {
        self.pending.is_some()
    }

    /// Handles the input's change event. Only the first file is previewed.
    /// An empty selection resets the view immediately and returns `None`.
    pub fn on_change(&mut self, files: &[SelectedFile]) -> Option<ReadTicket> {
        self.seq += 1;
        self.last_error = None;

        let Some(file) = files.first() else {
            self.pending = None;
            self.view = PreviewView::empty(self.kind);
            debug!(input = %self.input_id, seq = self.seq, "selection cleared");
            return None;
        };

        self.pending = Some(self.seq);
        debug!(input = %self.input_id, seq = self.seq, file = %file.name, "read issued");
        Some(ReadTicket {
            input_id: self.input_id.clone(),
            seq: self.seq,
            file: file.clone(),
        })
    }

    /// Applies a finished read. Returns `false` when the outcome belongs to
    /// another input or to a selection that has since been superseded.
    pub fn complete(&mut self, outcome: ReadOutcome) -> bool {
        if outcome.input_id != self.input_id || self.pending != Some(outcome.seq) {
            debug!(
                input = %self.input_id,
                seq = outcome.seq,
                latest = self.seq,
                "discarding stale read"
            );
            return false;
        }
        self.pending = None;

        match outcome.result {
            Ok(data_url) => {
                self.view = PreviewView {
                    source: Some(data_url),
                    preview: Visibility::Shown,
                    placeholder: Visibility::Hidden,
                    label: Label::REPLACE_IMAGE,
                };
            }
            Err(error) => {
                warn!(input = %self.input_id, %error, "preview failed");
                self.view = PreviewView::empty(self.kind);
                self.last_error = Some(error);
            }
        }
        true
    }

    /// Change event followed by the read, awaited in place.
    pub async fn preview_image(
        &mut self,
        files: &[SelectedFile],
        reader: &(dyn ImageReader + '_),
    ) {
        if let Some(ticket) = self.on_change(files) {
            let outcome = ticket.read(reader).await;
            self.complete(outcome);
        }
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;
