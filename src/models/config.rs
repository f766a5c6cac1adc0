//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::pagination::DEFAULT_PAGE_SIZE;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Root of the remote JSON API, e.g. `https://api.example.com`.
    pub api_base_url: String,
    pub templates_dir: String,
    pub secret: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
