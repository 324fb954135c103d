use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use server_api::{capacity_upload, embed_upload, extract_upload, ImageUpload, StegoContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        capacity_route, embed_route, extract_route, theme_css_route, CapacityResponse,
        ExtractResponse, CAPACITY_BITS_HEADER, EMBEDDED_BITS_HEADER, IMAGE_FIELD, MESSAGE_FIELD,
    },
    theme::Theme,
};
use stego::DctCodec;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

mod config;

use config::{load_settings, prepare_output_dir};

#[derive(Clone)]
struct AppState {
    ctx: StegoContext,
    theme_css: String,
}

type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Default)]
struct UploadForm {
    image: Option<ImageUpload>,
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let output_dir = settings
        .output_dir
        .as_deref()
        .map(prepare_output_dir)
        .transpose()?;
    let codec = DctCodec::new(settings.embed_step, settings.max_extract_bits)?;
    let theme_css = Theme::default().render_css()?;

    let state = AppState {
        ctx: StegoContext { codec, output_dir },
        theme_css,
    };
    let app = build_router(Arc::new(state), settings.max_upload_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        max_upload_bytes = settings.max_upload_bytes,
        embed_step = settings.embed_step,
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(embed_route(), post(embed))
        .route(extract_route(), post(extract))
        .route(capacity_route(), post(capacity))
        .route(theme_css_route(), get(theme_css))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn embed(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiFailure> {
    let form = read_form(multipart).await?;
    let (Some(image), Some(message)) = (form.image, form.message) else {
        return Err(failure(ApiError::validation(
            "Please provide both image and message",
        )));
    };

    let ctx = state.ctx.clone();
    let embedded = run_blocking(move || embed_upload(&ctx, &image, &message)).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", embedded.filename))
            .map_err(|e| failure(ApiError::internal(e.to_string())))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        HeaderName::from_static(EMBEDDED_BITS_HEADER),
        HeaderValue::from(embedded.bits_embedded),
    );
    headers.insert(
        HeaderName::from_static(CAPACITY_BITS_HEADER),
        HeaderValue::from(embedded.capacity_bits),
    );

    Ok((StatusCode::OK, headers, embedded.png))
}

async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiFailure> {
    let image = read_form(multipart)
        .await?
        .image
        .ok_or_else(|| failure(ApiError::validation("Please provide an image file")))?;

    let ctx = state.ctx.clone();
    let response = run_blocking(move || extract_upload(&ctx, &image)).await?;
    Ok(Json(response))
}

async fn capacity(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CapacityResponse>, ApiFailure> {
    let image = read_form(multipart)
        .await?
        .image
        .ok_or_else(|| failure(ApiError::validation("Please provide an image file")))?;

    let ctx = state.ctx.clone();
    let response = run_blocking(move || capacity_upload(&ctx, &image)).await?;
    Ok(Json(response))
}

async fn theme_css(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.theme_css.clone(),
    )
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiFailure> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_failure)?;
            form.image = Some(ImageUpload {
                filename,
                bytes: bytes.to_vec(),
            });
        } else if name == MESSAGE_FIELD {
            form.message = Some(field.text().await.map_err(multipart_failure)?);
        }
    }
    Ok(form)
}

async fn run_blocking<T, F>(job: F) -> Result<T, ApiFailure>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| failure(ApiError::internal(e.to_string())))?
        .map_err(failure)
}

fn multipart_failure(err: MultipartError) -> ApiFailure {
    let code = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorCode::PayloadTooLarge
    } else {
        ErrorCode::Validation
    };
    failure(ApiError::new(code, err.body_text()))
}

fn failure(err: ApiError) -> ApiFailure {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%status, code = ?err.code, message = %err.message, "request rejected");
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
