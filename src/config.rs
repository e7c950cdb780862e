//! Server settings read from the process environment.
//!
//! # Environment Variables
//!
//! - `HOST` - bind address (default: `0.0.0.0`)
//! - `PORT` - HTTP port (default: 5000)
//! - `DEBUG` - `"true"` (any case) raises the default log filter to debug

use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!("Invalid PORT value '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let debug = debug_flag(&lookup);

        Self { host, port, debug }
    }

    /// Only the `DEBUG` flag, for picking a log filter before logging is
    /// installed and the rest of the settings are read.
    pub fn debug_from_env() -> bool {
        debug_flag(&|key: &str| std::env::var(key).ok())
    }

    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        log_filter_for(self.debug)
    }
}

fn debug_flag<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DEBUG")
        .map(|d| d.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Default tracing filter for the given debug flag.
pub fn log_filter_for(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info,meta_crew_spawner=debug"
    }
}

/// Load a `.env` file from the working directory or its parents.
///
/// Returns the loaded path, or `None` when there is no file. Nothing is
/// logged here: this runs before any logger exists, so callers report the
/// outcome with [`report_dotenv`] once logging is installed.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Log the outcome of [`load_dotenv`].
pub fn report_dotenv(outcome: &Result<Option<PathBuf>, dotenvy::Error>) {
    match outcome {
        Ok(Some(path)) => log::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => log::warn!("Failed to load .env file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.default_log_filter(), "info,meta_crew_spawner=debug");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DEBUG", "TRUE"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.debug);
        assert_eq!(config.default_log_filter(), "debug");
    }

    #[test]
    fn test_debug_flag_matches_full_config() {
        for (value, expected) in [("true", true), ("True ", true), ("yes", false)] {
            let l = lookup(&[("DEBUG", value)]);
            assert_eq!(debug_flag(&l), expected);
            assert_eq!(ServerConfig::from_lookup(l).debug, expected);
        }
        assert!(!debug_flag(&lookup(&[])));
        assert_eq!(log_filter_for(true), "debug");
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "http"), ("DEBUG", "1")]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.debug);
    }
}
