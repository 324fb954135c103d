use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_engine_constants() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.embed_step, 10.0);
    assert_eq!(settings.max_extract_bits, 10_000);
    assert_eq!(settings.output_dir, None);
}

#[test]
fn file_overrides_accept_strings_and_numbers() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
            bind_addr = "0.0.0.0:8080"
            max_upload_bytes = 1024
            embed_step = 12.5
            output_dir = "./outputs"
        "#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.max_upload_bytes, 1024);
    assert_eq!(settings.embed_step, 12.5);
    assert_eq!(settings.output_dir.as_deref(), Some("./outputs"));
}

#[test]
fn unparsable_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "this is = = not toml");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_win_and_app_prefix_beats_legacy_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("APP__MAX_EXTRACT_BITS", "4096"),
            ("APP__OUTPUT_DIR", "/tmp/stego-out"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.max_extract_bits, 4096);
    assert_eq!(settings.output_dir.as_deref(), Some("/tmp/stego-out"));
}

#[test]
fn bad_numeric_env_values_keep_previous_setting() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[("APP__MAX_UPLOAD_BYTES", "lots"), ("APP__EMBED_STEP", "ten")]),
    );
    assert_eq!(settings.max_upload_bytes, Settings::default().max_upload_bytes);
    assert_eq!(settings.embed_step, 10.0);
}

#[test]
fn prepare_output_dir_creates_nested_directories() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let target = temp_root.path().join("nested").join("outputs");

    let prepared = prepare_output_dir(target.to_string_lossy().as_ref()).expect("prepare");
    assert_eq!(prepared, target);
    assert!(target.is_dir());
}

#[test]
fn prepare_output_dir_rejects_blank_path() {
    assert!(prepare_output_dir("   ").is_err());
}
