use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    error::ApiError,
    protocol::{
        capacity_route, embed_route, extract_route, CapacityResponse, ExtractResponse,
        EMBEDDED_BITS_HEADER, IMAGE_FIELD, MESSAGE_FIELD,
    },
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod modal;
pub mod page;
pub mod preview;
pub mod reader;
pub mod view;

pub use modal::ModalController;
pub use page::{PageEvent, PageState, PageUpdate};
pub use preview::{InputKind, Label, PreviewController, PreviewView};
pub use reader::{
    data_url, FsImageReader, ImageReader, PendingRead, PreviewError, ReadOutcome, ReadTicket,
    SelectedFile,
};
pub use view::{BodyState, Overflow, Visibility};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected request: {0}")]
    Api(ApiError),
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// A stego PNG returned by the embed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedDownload {
    pub filename: String,
    pub png: Vec<u8>,
    pub bits_embedded: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StegoClient {
    http: Client,
    server_url: String,
}

impl StegoClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let parsed = Url::parse(server_url)?;
        Ok(Self {
            http: Client::new(),
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn healthz(&self) -> Result<bool> {
        let res = self
            .http
            .get(format!("{}/healthz", self.server_url))
            .send()
            .await?;
        Ok(res.status().is_success())
    }

    pub async fn embed(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        message: &str,
    ) -> Result<EmbeddedDownload> {
        let form = Form::new()
            .part(IMAGE_FIELD, image_part(filename, bytes))
            .text(MESSAGE_FIELD, message.to_string());
        let res = self.post(embed_route(), form).await?;

        let headers = res.headers();
        let filename = headers
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| "embedded_image.png".to_string());
        let bits_embedded = headers
            .get(EMBEDDED_BITS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let png = res.bytes().await?.to_vec();
        debug!(%filename, bytes = png.len(), "embedded image downloaded");

        Ok(EmbeddedDownload {
            filename,
            png,
            bits_embedded,
        })
    }

    pub async fn extract(&self, filename: &str, bytes: Vec<u8>) -> Result<ExtractResponse> {
        let form = Form::new().part(IMAGE_FIELD, image_part(filename, bytes));
        let res = self.post(extract_route(), form).await?;
        Ok(res.json().await?)
    }

    pub async fn capacity(&self, filename: &str, bytes: Vec<u8>) -> Result<CapacityResponse> {
        let form = Form::new().part(IMAGE_FIELD, image_part(filename, bytes));
        let res = self.post(capacity_route(), form).await?;
        Ok(res.json().await?)
    }

    async fn post(&self, route: &str, form: Form) -> Result<Response> {
        let res = self
            .http
            .post(format!("{}{route}", self.server_url))
            .multipart(form)
            .send()
            .await?;
        check_status(res).await
    }
}

async fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await?;
    warn!(status = status.as_u16(), "server returned an error");
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(ClientError::Api(api_error)),
        Err(_) => Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        }),
    }
}

fn image_part(filename: &str, bytes: Vec<u8>) -> Part {
    Part::bytes(bytes).file_name(filename.to_string())
}

/// Pulls the quoted name out of `attachment; filename="..."`.
fn attachment_filename(disposition: &str) -> Option<String> {
    disposition.split(';').find_map(|param| {
        let value = param.trim().strip_prefix("filename=")?;
        let value = value.trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
