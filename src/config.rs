// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration: defaults, optional JSON file, environment, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::models::tool::Tool;

/// 16 MiB, matching the processing service's request ceiling.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 16 * 1024 * 1024;
/// Tool endpoints are mounted under `/api/pdf` on the processing service.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000/api/pdf";

/// Command-line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "docstage", version, about = "Stage documents and submit them to a processing service")]
pub struct Cli {
    /// Base URL of the document-processing service.
    #[arg(long, env = "DOCSTAGE_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Tool to open at startup.
    #[arg(long, value_enum)]
    pub tool: Option<Tool>,

    /// Maximum accepted file size in bytes.
    #[arg(long, env = "DOCSTAGE_MAX_SIZE")]
    pub max_size: Option<u64>,

    /// JSON configuration file.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Resolved application settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub service_url: String,
    pub tool: Tool,
    pub max_size_bytes: u64,
    pub notification_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Worker threads for background commands.
    pub workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            tool: Tool::default(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            notification_ttl_secs: 5,
            request_timeout_secs: 120,
            workers: std::thread::available_parallelism()
                .map(|n| n.get().max(2))
                .unwrap_or(2),
        }
    }
}

impl AppConfig {
    /// Layer the config file (if any) and CLI/env values over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file cannot be read or parsed.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(url) = &cli.service_url {
            config.service_url = url.clone();
        }
        if let Some(tool) = cli.tool {
            config.tool = tool;
        }
        if let Some(max) = cli.max_size {
            config.max_size_bytes = max;
        }
        config.workers = config.workers.max(1);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::Mutex;

    use super::*;
    use tempfile::TempDir;

    // Tests that parse the command line read process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TempEnv {
        key: &'static str,
        prev: Option<String>,
    }

    impl TempEnv {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let prev = env::var(key).ok();
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
            Self { key, prev }
        }
    }

    impl Drop for TempEnv {
        fn drop(&mut self) {
            unsafe {
                match &self.prev {
                    Some(value) => env::set_var(self.key, value),
                    None => env::remove_var(self.key),
                }
            }
        }
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let config = AppConfig::resolve(&Cli::default()).unwrap();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.tool, Tool::MergePdf);
        assert_eq!(config.max_size_bytes, 16 * 1024 * 1024);
        assert_eq!(config.notification_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn file_values_fill_gaps_and_flags_win() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docstage.json");
        std::fs::write(
            &path,
            r#"{"serviceUrl": "http://files.example:9000", "tool": "image-to-pdf", "maxSizeBytes": 1024}"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            max_size: Some(2048),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli).unwrap();

        assert_eq!(config.service_url, "http://files.example:9000");
        assert_eq!(config.tool, Tool::ImageToPdf);
        assert_eq!(config.max_size_bytes, 2048);
        assert_eq!(config.notification_ttl_secs, 5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn cli_parses_flags() {
        let _lock = ENV_LOCK.lock().unwrap();
        let cli = Cli::try_parse_from([
            "docstage",
            "--tool",
            "compress-pdf",
            "--service-url",
            "http://x",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.tool, Some(Tool::CompressPdf));
        assert_eq!(cli.service_url.as_deref(), Some("http://x"));
        assert!(cli.verbose);
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _url = TempEnv::set("DOCSTAGE_SERVICE_URL", Some("http://env.example/api/pdf"));
        let _max = TempEnv::set("DOCSTAGE_MAX_SIZE", Some("4096"));
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docstage.json");
        std::fs::write(
            &path,
            r#"{"serviceUrl": "http://file.example/api/pdf", "maxSizeBytes": 1024}"#,
        )
        .unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["docstage", "-c", config_arg.as_str()]).unwrap();
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.service_url, "http://env.example/api/pdf");
        assert_eq!(config.max_size_bytes, 4096);

        let cli = Cli::try_parse_from([
            "docstage",
            "-c",
            config_arg.as_str(),
            "--max-size",
            "8192",
            "--service-url",
            "http://flag.example/api/pdf",
        ])
        .unwrap();
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.service_url, "http://flag.example/api/pdf");
        assert_eq!(config.max_size_bytes, 8192);
    }
}
