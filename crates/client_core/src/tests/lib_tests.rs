use super::*;
use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

async fn mock_embed(mut multipart: Multipart) -> impl IntoResponse {
    let mut filename = String::new();
    let mut message = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            filename = field.file_name().unwrap_or_default().to_string();
        } else if name == MESSAGE_FIELD {
            message = field.text().await.unwrap_or_default();
        }
    }
    (
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"embedded_{filename}\""),
            ),
            (
                header::HeaderName::from_static(EMBEDDED_BITS_HEADER),
                ((message.len() + 9) * 8).to_string(),
            ),
        ],
        message.into_bytes(),
    )
}

async fn mock_extract() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(
            ErrorCode::NotFound,
            "No hidden message found in the image",
        )),
    )
}

async fn mock_capacity() -> Json<CapacityResponse> {
    Json(CapacityResponse {
        width: 64,
        height: 64,
        full_blocks: 64,
        capacity_bits: 3136,
        max_message_chars: 383,
    })
}

async fn spawn_mock_server() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/embed", post(mock_embed))
        .route("/extract", post(mock_extract))
        .route("/capacity", post(mock_capacity))
        .route("/broken", post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/"))
}

#[test]
fn rejects_invalid_server_url() {
    assert!(matches!(
        StegoClient::new("not a url"),
        Err(ClientError::InvalidUrl(_))
    ));
}

#[test]
fn trailing_slash_is_trimmed() {
    let client = StegoClient::new("http://localhost:5000/").expect("client");
    assert_eq!(client.server_url(), "http://localhost:5000");
}

#[test]
fn attachment_filename_is_parsed() {
    assert_eq!(
        attachment_filename("attachment; filename=\"embedded_cat.png\"").as_deref(),
        Some("embedded_cat.png")
    );
    assert_eq!(attachment_filename("inline"), None);
}

#[tokio::test]
async fn embed_downloads_png_and_metadata() {
    let url = spawn_mock_server().await.expect("mock server");
    let client = StegoClient::new(&url).expect("client");
    assert!(client.healthz().await.expect("healthz"));

    let download = client
        .embed("cat.png", vec![1, 2, 3], "hello")
        .await
        .expect("embed");
    assert_eq!(download.filename, "embedded_cat.png");
    assert_eq!(download.png, b"hello");
    assert_eq!(download.bits_embedded, Some(112));
}

#[tokio::test]
async fn api_errors_are_decoded() {
    let url = spawn_mock_server().await.expect("mock server");
    let client = StegoClient::new(&url).expect("client");

    let err = client
        .extract("plain.png", vec![0; 16])
        .await
        .expect_err("no message");
    match err {
        ClientError::Api(api) => {
            assert_eq!(api.code, ErrorCode::NotFound);
            assert_eq!(api.message, "No hidden message found in the image");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn capacity_is_decoded() {
    let url = spawn_mock_server().await.expect("mock server");
    let client = StegoClient::new(&url).expect("client");

    let capacity = client
        .capacity("cover.png", vec![0; 16])
        .await
        .expect("capacity");
    assert_eq!(capacity.capacity_bits, 3136);
    assert_eq!(capacity.max_message_chars, 383);
}

#[tokio::test]
async fn non_json_failures_keep_status_and_body() {
    let url = spawn_mock_server().await.expect("mock server");
    let client = StegoClient::new(&url).expect("client");

    let err = client
        .post("/broken", Form::new().text("x", "y"))
        .await
        .expect_err("bad gateway");
    match err {
        ClientError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other}"),
    }
}
