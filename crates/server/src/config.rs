use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use stego::{DEFAULT_MAX_EXTRACT_BITS, STEP};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub max_upload_bytes: usize,
    pub embed_step: f64,
    pub max_extract_bits: usize,
    pub output_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            max_upload_bytes: 16 * 1024 * 1024,
            embed_step: STEP,
            max_extract_bits: DEFAULT_MAX_EXTRACT_BITS,
            output_dir: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub(crate) fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, "ignoring unparsable server.toml");
            return;
        }
    };

    let value = |key: &str| {
        file_cfg.get(key).map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };

    if let Some(v) = value("bind_addr") {
        settings.server_bind = v;
    }
    if let Some(v) = value("max_upload_bytes") {
        set_parsed(&mut settings.max_upload_bytes, "max_upload_bytes", &v);
    }
    if let Some(v) = value("embed_step") {
        set_parsed(&mut settings.embed_step, "embed_step", &v);
    }
    if let Some(v) = value("max_extract_bits") {
        set_parsed(&mut settings.max_extract_bits, "max_extract_bits", &v);
    }
    if let Some(v) = value("output_dir") {
        settings.output_dir = Some(v);
    }
}

pub(crate) fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__MAX_UPLOAD_BYTES") {
        set_parsed(&mut settings.max_upload_bytes, "APP__MAX_UPLOAD_BYTES", &v);
    }
    if let Some(v) = lookup("APP__EMBED_STEP") {
        set_parsed(&mut settings.embed_step, "APP__EMBED_STEP", &v);
    }
    if let Some(v) = lookup("APP__MAX_EXTRACT_BITS") {
        set_parsed(&mut settings.max_extract_bits, "APP__MAX_EXTRACT_BITS", &v);
    }

    if let Some(v) = lookup("APP__OUTPUT_DIR") {
        settings.output_dir = Some(v);
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = raw, "ignoring unparsable setting"),
    }
}

pub fn prepare_output_dir(raw_output_dir: &str) -> anyhow::Result<PathBuf> {
    let raw_output_dir = raw_output_dir.trim();
    if raw_output_dir.is_empty() {
        anyhow::bail!("output directory must not be empty");
    }

    let path = Path::new(raw_output_dir).to_path_buf();
    fs::create_dir_all(&path).with_context(|| {
        format!("failed to create output directory '{}'", path.display())
    })?;

    Ok(path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
