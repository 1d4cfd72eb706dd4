use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Error banners stay up for 5 seconds, success banners for 3.
pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(5);
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

/// How long the binary waits for the connectivity check past its start delay.
pub const PROBE_GRACE: Duration = Duration::from_secs(2);

fn default_max_file_size() -> u64 {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub max_file_size: u64,
    pub download_dir: PathBuf,
    pub probe_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_file_size: default_max_file_size(),
            download_dir: PathBuf::from("."),
            probe_delay: Duration::from_millis(1000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let mut config = Config::default();

        if let Ok(url) = std::env::var("STATLY_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(raw) = std::env::var("STATLY_MAX_FILE_SIZE") {
            config.max_file_size = raw
                .trim()
                .parse()
                .with_context(|| format!("STATLY_MAX_FILE_SIZE is not a byte count: {raw}"))?;
        }
        if let Ok(dir) = std::env::var("STATLY_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = std::env::var("STATLY_PROBE_DELAY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("STATLY_PROBE_DELAY_MS is not a millisecond count: {raw}"))?;
            config.probe_delay = Duration::from_millis(millis);
        }

        Ok(config.normalized())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self.normalized()
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    fn normalized(mut self) -> Self {
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.probe_delay, Duration::from_secs(1));
    }

    // only test touching STATLY_* so parallel tests never see these values
    #[test]
    fn from_env_rejects_malformed_numbers() {
        let vars = [
            "STATLY_API_BASE_URL",
            "STATLY_MAX_FILE_SIZE",
            "STATLY_DOWNLOAD_DIR",
            "STATLY_PROBE_DELAY_MS",
        ];
        let clear = || vars.iter().for_each(|v| std::env::remove_var(v));
        clear();

        std::env::set_var("STATLY_MAX_FILE_SIZE", "ten megabytes");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("STATLY_MAX_FILE_SIZE"));
        clear();

        std::env::set_var("STATLY_PROBE_DELAY_MS", "-5");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("STATLY_PROBE_DELAY_MS"));
        clear();

        std::env::set_var("STATLY_API_BASE_URL", "http://stats.internal:9000/api/");
        std::env::set_var("STATLY_MAX_FILE_SIZE", " 2048 ");
        std::env::set_var("STATLY_DOWNLOAD_DIR", "/tmp/reports");
        std::env::set_var("STATLY_PROBE_DELAY_MS", "250");
        let config = Config::from_env().unwrap();
        clear();

        assert_eq!(config.api_base_url, "http://stats.internal:9000/api");
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.probe_delay, Duration::from_millis(250));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = Config::default().with_base_url("http://example.test/api///");
        assert_eq!(config.endpoint("/analyze"), "http://example.test/api/analyze");
        assert_eq!(config.endpoint(""), "http://example.test/api/");
    }
}
