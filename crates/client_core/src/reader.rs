use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

/// A file picked through a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("failed to read {name}: {reason}")]
    Io { name: String, reason: String },
    #[error("{name} is empty")]
    Empty { name: String },
    #[error("{name} is not a supported image")]
    NotAnImage { name: String },
    #[error("read of {name} did not complete: {reason}")]
    Interrupted { name: String, reason: String },
}

#[async_trait]
pub trait ImageReader: Send + Sync {
    /// Reads the file and encodes it as a `data:` URL.
    async fn read_data_url(&self, file: &SelectedFile) -> Result<String, PreviewError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageReader;

#[async_trait]
impl ImageReader for FsImageReader {
    async fn read_data_url(&self, file: &SelectedFile) -> Result<String, PreviewError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| PreviewError::Io {
                name: file.name.clone(),
                reason: e.to_string(),
            })?;
        debug!(file = %file.name, bytes = bytes.len(), "image read");
        data_url(&file.name, &bytes)
    }
}

/// `data:<mime>;base64,<payload>`. The MIME type comes from the content
/// when it is a recognised image, otherwise from an image extension.
pub fn data_url(name: &str, bytes: &[u8]) -> Result<String, PreviewError> {
    if bytes.is_empty() {
        return Err(PreviewError::Empty {
            name: name.to_string(),
        });
    }
    let mime = match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => mime_guess::from_path(name)
            .first_raw()
            .filter(|mime| mime.starts_with("image/"))
            .ok_or_else(|| PreviewError::NotAnImage {
                name: name.to_string(),
            })?,
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// A read issued by a preview controller. `seq` ties the completion back to
/// the selection that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadTicket {
    pub input_id: String,
    pub seq: u64,
    pub file: SelectedFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub input_id: String,
    pub seq: u64,
    pub result: Result<String, PreviewError>,
}

impl ReadTicket {
    pub async fn read(self, reader: &(dyn ImageReader + '_)) -> ReadOutcome {
        let result = reader.read_data_url(&self.file).await;
        ReadOutcome {
            input_id: self.input_id,
            seq: self.seq,
            result,
        }
    }

    /// Runs the read on the tokio runtime; join it with [`PendingRead::join`].
    pub fn spawn(self, reader: Arc<dyn ImageReader>) -> PendingRead {
        let input_id = self.input_id.clone();
        let seq = self.seq;
        let name = self.file.name.clone();
        let handle = tokio::spawn(async move { self.read(reader.as_ref()).await });
        PendingRead {
            input_id,
            seq,
            name,
            handle,
        }
    }
}

#[derive(Debug)]
pub struct PendingRead {
    input_id: String,
    seq: u64,
    name: String,
    handle: JoinHandle<ReadOutcome>,
}

impl PendingRead {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub async fn join(self) -> ReadOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => ReadOutcome {
                input_id: self.input_id,
                seq: self.seq,
                result: Err(PreviewError::Interrupted {
                    name: self.name,
                    reason: e.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
