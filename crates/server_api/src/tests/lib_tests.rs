use super::*;
use image::{Rgb, RgbImage};

fn png_upload(filename: &str, width: u32, height: u32) -> ImageUpload {
    let cover = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 2) as u8, 128]));
    ImageUpload {
        filename: filename.to_string(),
        bytes: stego::encode_png(&cover).expect("png"),
    }
}

#[test]
fn output_filename_swaps_extension_for_png() {
    assert_eq!(output_filename("photo.jpg"), "embedded_photo.png");
    assert_eq!(output_filename("archive.tar.gz"), "embedded_archive.tar.png");
    assert_eq!(output_filename("noext"), "embedded_noext.png");
    assert_eq!(output_filename("  "), "embedded_image.png");
}

#[test]
fn output_filename_is_safe_inside_a_quoted_header() {
    assert_eq!(output_filename("a\".png"), "embedded_a.png");
    assert_eq!(output_filename("say \"hi\".jpg"), "embedded_say hi.png");
    assert_eq!(output_filename("bell\u{7}tab\tname.png"), "embedded_belltabname.png");
    assert_eq!(output_filename("\"\".png"), "embedded_image.png");
}

#[test]
fn quoted_upload_name_yields_clean_download_name() {
    let ctx = StegoContext::default();
    let embedded = embed_upload(&ctx, &png_upload("my \"best\" shot.png", 32, 32), "hi")
        .expect("embed");
    assert_eq!(embedded.filename, "embedded_my best shot.png");
}

#[test]
fn embed_then_extract_through_uploads() {
    let ctx = StegoContext::default();
    let upload = png_upload("cover.png", 64, 64);

    let embedded = embed_upload(&ctx, &upload, "meet at noon").expect("embed");
    assert_eq!(embedded.filename, "embedded_cover.png");
    assert_eq!(embedded.capacity_bits, 64 * 49);
    assert!(embedded.archived_to.is_none());

    let stego_upload = ImageUpload {
        filename: embedded.filename.clone(),
        bytes: embedded.png,
    };
    let response = extract_upload(&ctx, &stego_upload).expect("extract");
    assert_eq!(response.message, "meet at noon");
    assert!(response.delimiter_found);
}

#[test]
fn blank_message_is_rejected() {
    let ctx = StegoContext::default();
    let err = embed_upload(&ctx, &png_upload("cover.png", 32, 32), "   ").expect_err("blank");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "Please provide both image and message");
}

#[test]
fn upload_validation_rejects_bad_names_and_empty_bodies() {
    let ctx = StegoContext::default();

    let mut upload = png_upload("", 16, 16);
    let err = capacity_upload(&ctx, &upload).expect_err("empty name");
    assert_eq!(err.message, "Please select an image file");

    upload.filename = "../etc/passwd".into();
    let err = capacity_upload(&ctx, &upload).expect_err("separator");
    assert_eq!(err.message, "filename must not contain path separators");

    upload.filename = "x".repeat(MAX_FILENAME_BYTES + 1);
    let err = capacity_upload(&ctx, &upload).expect_err("long name");
    assert_eq!(err.message, "filename is too long");

    let empty = ImageUpload {
        filename: "empty.png".into(),
        bytes: Vec::new(),
    };
    let err = extract_upload(&ctx, &empty).expect_err("empty body");
    assert_eq!(err.message, "image file is empty");
}

#[test]
fn undecodable_upload_is_a_validation_error() {
    let ctx = StegoContext::default();
    let upload = ImageUpload {
        filename: "notes.txt".into(),
        bytes: b"plain text".to_vec(),
    };
    let err = extract_upload(&ctx, &upload).expect_err("not an image");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.starts_with("failed to decode image"));
}

#[test]
fn over_capacity_message_reports_capacity() {
    let ctx = StegoContext::default();
    let err = embed_upload(&ctx, &png_upload("tiny.png", 16, 8), "too long for this")
        .expect_err("too long");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.starts_with("Message too long. Maximum capacity: 12 characters"));
}

#[test]
fn cover_that_cannot_hold_bits_is_a_validation_error() {
    let ctx = StegoContext {
        codec: DctCodec::new(1e-3, stego::DEFAULT_MAX_EXTRACT_BITS).expect("codec"),
        output_dir: None,
    };
    let err = embed_upload(&ctx, &png_upload("flat.png", 32, 32), "hello")
        .expect_err("bits would be lost");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.starts_with("this image cannot carry the message"));
}

#[test]
fn image_without_blocks_has_no_hidden_message() {
    let ctx = StegoContext::default();
    let err = extract_upload(&ctx, &png_upload("small.png", 4, 4)).expect_err("none");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "No hidden message found in the image");
}

#[test]
fn capacity_reports_dimensions_and_usable_chars() {
    let ctx = StegoContext::default();
    let response = capacity_upload(&ctx, &png_upload("cover.png", 40, 17)).expect("capacity");
    assert_eq!(response.width, 40);
    assert_eq!(response.height, 17);
    assert_eq!(response.full_blocks, 10);
    assert_eq!(response.capacity_bits, 490);
    assert_eq!(response.max_message_chars, 61 - stego::DELIMITER.len());
}

#[test]
fn output_dir_receives_archived_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = StegoContext {
        codec: DctCodec::default(),
        output_dir: Some(dir.path().join("outputs")),
    };

    let embedded = embed_upload(&ctx, &png_upload("cover.png", 32, 32), "kept").expect("embed");
    let archived = embedded.archived_to.expect("archived path");
    assert!(archived.starts_with(dir.path().join("outputs")));
    assert!(archived
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("_embedded_cover.png")));
    assert_eq!(fs::read(&archived).expect("read archive"), embedded.png);
}
