//! Application configuration loaded from environment variables.

use std::net::IpAddr;
use std::path::PathBuf;

use serde::Deserialize;
use strum::{Display, EnumString};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, multi-field lines.
    #[default]
    #[strum(serialize = "pretty")]
    Pretty,
    /// One JSON object per line.
    #[strum(serialize = "json")]
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Directory holding the static front-end (index.html and assets).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            static_dir: default_static_dir(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.host.parse::<IpAddr>().is_err() && !is_hostname(&self.host) {
            return Err(format!("HOST {:?} is neither an IP address nor a hostname", self.host));
        }

        if self.static_dir.as_os_str().is_empty() {
            return Err("STATIC_DIR must not be empty".to_string());
        }

        Ok(())
    }

    /// Host and port to hand to the listener; hostnames are resolved at bind time.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// Display form of the bind address. IPv6 literals are bracketed.
    pub fn bind_addr(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}

/// RFC 1123 hostname: dot-separated labels of alphanumerics and inner hyphens.
fn is_hostname(host: &str) -> bool {
    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
