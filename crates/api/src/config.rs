use std::path::PathBuf;

use bookshelf_core::context::DEFAULT_LOCALE;

/// Invalid configuration values. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path prefix of the API portal (default: `/api`).
    pub api_root: String,
    /// Directory served as static files (default: `public`).
    pub static_dir: PathBuf,
    /// Directory holding the HTML templates (default: `views`).
    pub template_dir: PathBuf,
    /// Title shown on rendered pages.
    pub app_title: String,
    /// Locale used when a request names none.
    pub default_locale: String,
    /// User assumed for requests without user headers; `None` keeps them anonymous.
    pub demo_user: Option<String>,
    /// Roles of the demo user.
    pub demo_roles: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            api_root: "/api".into(),
            static_dir: PathBuf::from("public"),
            template_dir: PathBuf::from("views"),
            app_title: "Bookshelf".into(),
            default_locale: DEFAULT_LOCALE.into(),
            demo_user: None,
            demo_roles: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `API_ROOT`             | `/api`                     |
    /// | `STATIC_DIR`           | `public`                   |
    /// | `TEMPLATE_DIR`         | `views`                    |
    /// | `APP_TITLE`            | `Bookshelf`                |
    /// | `DEFAULT_LOCALE`       | `en`                       |
    /// | `DEMO_USER`            | unset                      |
    /// | `DEMO_ROLES`           | empty                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a valid u16",
                value: v,
            })?,
            None => defaults.port,
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "REQUEST_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: v,
                })?,
            None => defaults.request_timeout_secs,
        };

        let api_root = match var("API_ROOT") {
            Some(v) => {
                let trimmed = v.trim_matches('/');
                if trimmed.is_empty() {
                    return Err(ConfigError::Invalid {
                        key: "API_ROOT",
                        expected: "a non-root path such as /api",
                        value: v,
                    });
                }
                format!("/{trimmed}")
            }
            None => defaults.api_root,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            cors_origins: var("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_origins),
            request_timeout_secs,
            api_root,
            static_dir: var("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            template_dir: var("TEMPLATE_DIR").map_or(defaults.template_dir, PathBuf::from),
            app_title: var("APP_TITLE").unwrap_or(defaults.app_title),
            default_locale: var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            demo_user: var("DEMO_USER"),
            demo_roles: var("DEMO_ROLES").map(|v| split_list(&v)).unwrap_or_default(),
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
