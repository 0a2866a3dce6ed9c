//! Builds the per-request [`ModelContext`] from request headers.
//!
//! Which user and locale a request runs as is decided by the readers in
//! [`ContextConfig`], handed to the application state at startup.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use bookshelf_core::context::{ModelContext, UserInfo};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// Determines the current user of a request.
pub trait UserReader: Send + Sync {
    fn read_user(&self, headers: &HeaderMap) -> Option<UserInfo>;
}

/// Determines the locale of a request.
pub trait LocaleReader: Send + Sync {
    fn read_locale(&self, headers: &HeaderMap) -> String;
}

/// User from `x-user-name` and comma-separated `x-user-roles` headers.
///
/// Requests without a user name fall back to the demo user, if any.
/// Both headers are taken at face value, so any caller can claim any role.
/// For demo use only; put a verifying reader in front of real data.
#[derive(Debug, Clone, Default)]
pub struct HeaderUserReader {
    fallback: Option<UserInfo>,
}

impl HeaderUserReader {
    pub fn new(fallback: Option<UserInfo>) -> Self {
        Self { fallback }
    }
}

impl UserReader for HeaderUserReader {
    fn read_user(&self, headers: &HeaderMap) -> Option<UserInfo> {
        let name = header(headers, USER_NAME_HEADER).filter(|n| !n.is_empty());
        let Some(name) = name else {
            return self.fallback.clone();
        };
        let roles: Vec<&str> = header(headers, USER_ROLES_HEADER)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        Some(UserInfo::new(name, &roles))
    }
}

/// First language tag of `Accept-Language`, or the default locale.
#[derive(Debug, Clone)]
pub struct AcceptLanguageReader {
    default_locale: String,
}

impl AcceptLanguageReader {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
        }
    }
}

impl LocaleReader for AcceptLanguageReader {
    fn read_locale(&self, headers: &HeaderMap) -> String {
        header(headers, "accept-language")
            .and_then(|v| v.split(',').next())
            .map(|tag| tag.split(';').next().unwrap_or(tag).trim())
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .map_or_else(|| self.default_locale.clone(), str::to_string)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// User and locale readers used for every request.
#[derive(Clone)]
pub struct ContextConfig {
    pub user_reader: Arc<dyn UserReader>,
    pub locale_reader: Arc<dyn LocaleReader>,
}

impl ContextConfig {
    pub fn new(user_reader: Arc<dyn UserReader>, locale_reader: Arc<dyn LocaleReader>) -> Self {
        Self {
            user_reader,
            locale_reader,
        }
    }

    /// Header-based readers configured from the server settings.
    pub fn from_config(config: &ServerConfig) -> Self {
        let fallback = config.demo_user.as_ref().map(|name| {
            let roles: Vec<&str> = config.demo_roles.iter().map(String::as_str).collect();
            UserInfo::new(name.as_str(), &roles)
        });
        Self::new(
            Arc::new(HeaderUserReader::new(fallback)),
            Arc::new(AcceptLanguageReader::new(config.default_locale.as_str())),
        )
    }

    pub fn context(&self, headers: &HeaderMap) -> ModelContext {
        ModelContext::new(
            self.user_reader.read_user(headers),
            self.locale_reader.read_locale(headers),
        )
    }
}

/// Extractor yielding the [`ModelContext`] of the current request.
///
/// ```ignore
/// async fn handler(RequestContext(ctx): RequestContext) -> AppResult<Json<()>> {
///     tracing::info!(user = ?ctx.user_name(), locale = %ctx.locale, "handling request");
///     Ok(Json(()))
/// }
/// ```
pub struct RequestContext(pub ModelContext);

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestContext(state.context.context(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn user_comes_from_headers() {
        let reader = HeaderUserReader::default();
        let user = reader
            .read_user(&headers(&[
                (USER_NAME_HEADER, "ann"),
                (USER_ROLES_HEADER, "editor, admin"),
            ]))
            .unwrap();
        assert_eq!(user.user_name, "ann");
        assert!(user.is_in_role("editor"));
        assert!(user.is_in_role("admin"));
    }

    #[test]
    fn missing_user_falls_back_to_demo_user() {
        let anonymous = HeaderUserReader::default();
        assert!(anonymous.read_user(&HeaderMap::new()).is_none());

        let reader = HeaderUserReader::new(Some(UserInfo::new("demo", &["editor"])));
        let user = reader.read_user(&HeaderMap::new()).unwrap();
        assert_eq!(user.user_name, "demo");
    }

    #[test]
    fn locale_is_first_accepted_language() {
        let reader = AcceptLanguageReader::new("en");
        let weighted = headers(&[("accept-language", "de-DE;q=0.9, en;q=0.8")]);
        assert_eq!(reader.read_locale(&weighted), "de-DE");

        let wildcard = headers(&[("accept-language", "*")]);
        assert_eq!(reader.read_locale(&wildcard), "en");
        assert_eq!(reader.read_locale(&HeaderMap::new()), "en");
    }
}
