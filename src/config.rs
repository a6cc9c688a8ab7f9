//! Application configuration.
//!
//! Browser builds take their settings at compile time (`option_env!`), since
//! there is no process environment in WASM. The SSR binary reads its listen
//! port from the environment at startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_LANDING_PATH: &str = "/";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_PORT: u16 = 3000;

/// Storage key names shared by the session-scoped and persistent stores.
pub mod keys {
    pub const TOKEN: &str = "admin_console_token";
    pub const USER: &str = "admin_console_user";
    /// Session-scoped only.
    pub const REDIRECT: &str = "admin_console_redirect";
}

/// Client-side settings provided to pages via context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix for every REST call, without a trailing slash.
    pub api_base_url: String,
    /// Where a freshly authenticated user lands when no redirect is pending.
    pub landing_path: String,
    pub login_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: normalize_base_url(option_env!("ADMIN_CONSOLE_API_BASE").unwrap_or(DEFAULT_API_BASE_URL)),
            landing_path: DEFAULT_LANDING_PATH.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
        }
    }
}

impl AppConfig {
    /// Join `path` onto the API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

/// Settings for the SSR server binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000; unparsable values fall back to the default
    pub fn from_env() -> Self {
        Self { port: parse_port(std::env::var("PORT").ok().as_deref()) }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}
