//! Settings for the `clipper` binary, read from a RON file.
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clipper_engine::FetchSettings;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// URL returning the JSON array of pending messages.
    pub message_endpoint: String,
    /// Directory that receives one Markdown document per message.
    pub document_directory: PathBuf,
    pub fetch: FetchOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            message_endpoint: String::new(),
            document_directory: PathBuf::from("."),
            fetch: FetchOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchOptions {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl FetchOptions {
    pub fn to_fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::parse(
            r#"(message_endpoint: "https://bot.example.com/messages", fetch: (max_bytes: 1024))"#,
        )
        .unwrap();
        assert_eq!(settings.message_endpoint, "https://bot.example.com/messages");
        assert_eq!(settings.document_directory, PathBuf::from("."));
        assert_eq!(settings.fetch.max_bytes, 1024);
        assert_eq!(settings.fetch.redirect_limit, 5);
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let settings = Settings::parse("(document_directory: \".\")").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.fetch.to_fetch_settings().request_timeout,
            FetchSettings::default().request_timeout
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("(document_dir: \"x\")").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clipper.ron");
        fs::write(&path, "(document_directory: \"notes/line\")").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.document_directory, PathBuf::from("notes/line"));
        assert!(Settings::load(&dir.path().join("missing.ron")).is_err());
    }
}
