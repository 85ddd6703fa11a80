//! Configuration management.
//!
//! Settings come from an optional TOML file (`trip-search.toml`, discovered
//! in the working directory or the platform config directory) merged with
//! `TRIP_SEARCH_`-prefixed environment variables; the environment wins.

use crate::browser::ScrollConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP serving settings
    #[serde(default)]
    pub server: ServerConfig,

    /// WebDriver session settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Incremental-loader tuning for scroll-rendered pages
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// Pagination settings for click-through sources
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// HTTP bind settings for `serve --http`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

/// WebDriver session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver endpoint, e.g. a local chromedriver.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser headless.
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Upper bound on each wait-for-selector step, in milliseconds.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wait_timeout_ms() -> u64 {
    30_000
}

/// Pagination settings for sources that click through result pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Hard ceiling on pages visited per search, whatever the site's
    /// next-page control reports.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between page clicks, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_max_pages() -> u32 {
    50
}

fn default_page_delay_ms() -> u64 {
    1_000
}

/// Load configuration from a file, layering environment overrides on top.
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("TRIP_SEARCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// Locate a config file in the default locations.
///
/// Checks `./trip-search.toml` first, then the platform config directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("trip-search.toml");
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("trip-search").join("config.toml"))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(config.browser.headless);
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.pagination.max_pages, 50);
        assert_eq!(config.scroll.max_attempts, 30);
    }

    #[test]
    fn defaults_ignore_the_process_environment() {
        // Environment layering happens only in load_config; plain defaults
        // must not pick up overrides behind the caller's back.
        std::env::set_var("TRIP_SEARCH_BROWSER__WEBDRIVER_URL", "http://elsewhere:9515");
        let config = Config::default();
        std::env::remove_var("TRIP_SEARCH_BROWSER__WEBDRIVER_URL");

        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn config_parses_from_toml() {
        let toml = r#"
            [server]
            port = 8080

            [browser]
            webdriver_url = "http://localhost:9515"
            headless = false

            [scroll]
            max_attempts = 10
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
        assert!(!config.browser.headless);
        assert_eq!(config.scroll.max_attempts, 10);
        assert_eq!(config.scroll.step_px, 600);
    }
}
