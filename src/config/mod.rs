//! Configuration module for the Community Hub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Optional JSON datastore used to seed the in-memory store
    pub seed_path: Option<PathBuf>,
    /// Page size used when a list query does not specify one
    pub default_page_size: usize,
    /// Largest page size a list query may request
    pub max_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            log_json: false,
            seed_path: None,
            default_page_size: 6,
            max_page_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let bind_addr = match env::var("HUB_BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::InvalidArgument(format!("Invalid HUB_BIND_ADDR format: {}", raw))
            })?,
            Err(_) => defaults.bind_addr,
        };

        let log_level = env::var("HUB_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_json = match env::var("HUB_LOG_FORMAT") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => true,
                "text" | "" => false,
                _ => {
                    return Err(AppError::InvalidArgument(format!(
                        "HUB_LOG_FORMAT must be json or text, got {}",
                        raw
                    )))
                }
            },
            Err(_) => defaults.log_json,
        };

        let seed_path = env::var("HUB_SEED_PATH").ok().map(PathBuf::from);

        let default_page_size =
            parse_page_size("HUB_DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = parse_page_size("HUB_MAX_PAGE_SIZE", defaults.max_page_size)?;

        if default_page_size > max_page_size {
            return Err(AppError::InvalidArgument(format!(
                "HUB_DEFAULT_PAGE_SIZE ({}) exceeds HUB_MAX_PAGE_SIZE ({})",
                default_page_size, max_page_size
            )));
        }

        Ok(Self {
            bind_addr,
            log_level,
            log_json,
            seed_path,
            default_page_size,
            max_page_size,
        })
    }
}

fn parse_page_size(var: &str, default: usize) -> Result<usize, AppError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(AppError::InvalidArgument(format!(
                "{} must be a positive integer, got {:?}",
                var, raw
            ))),
        },
        Err(_) => Ok(default),
    }
}
