use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardbook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind port for the REST API. Override with `WARDBOOK_PORT`.
pub const DEFAULT_PORT: u16 = 7420;

/// Get the application data directory
/// ~/Wardbook/ on all platforms, `WARDBOOK_DATA_DIR` overrides
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WARDBOOK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Wardbook")
}

/// Get the database path
pub fn db_path() -> PathBuf {
    app_data_dir().join("wardbook.db")
}

/// Bind address for the REST API. `WARDBOOK_HOST` overrides (default loopback).
pub fn bind_host() -> IpAddr {
    std::env::var("WARDBOOK_HOST")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Bind port for the REST API. `WARDBOOK_PORT` overrides.
pub fn bind_port() -> u16 {
    std::env::var("WARDBOOK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "info,wardbook=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_under_app_data() {
        let db = db_path();
        let app = app_data_dir();
        assert!(db.starts_with(app));
        assert!(db.ends_with("wardbook.db"));
    }

    #[test]
    fn app_name_is_wardbook() {
        assert_eq!(APP_NAME, "Wardbook");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_includes_crate() {
        assert!(default_log_filter().contains("wardbook"));
    }
}
