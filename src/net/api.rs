//! REST API client for the admin backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: [`HttpApi`] returns
//! [`ApiError::Unavailable`], since these endpoints are only called from the
//! browser. Controllers are written against the traits below so tests can
//! substitute in-memory fakes.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses and undecodable bodies stay distinct
//! in [`ApiError`]. The login controller reports all of them with one generic
//! message; data pages use [`ApiError::is_unauthorized`] to prompt re-login.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use md5::{Digest, Md5};

use super::types::{ConfigOption, Credentials, Indicator, MenuNode, Session};
use crate::config::AppConfig;
use crate::state::session::SessionStore;
use crate::util::storage::KeyValueStore;

pub const LOGIN_PATH: &str = "/login";
pub const SSO_LOGIN_PATH: &str = "/api/token/sso-login";
pub const MENU_TREE_PATH: &str = "/api/menu/getTree";
pub const CONFIG_OPTIONS_PATH: &str = "/api/config/options";
pub const INDICATOR_LIST_PATH: &str = "/api/indicator/list";
pub const INDICATOR_SAVE_PATH: &str = "/api/indicator/save";
pub const INDICATOR_DELETE_PATH: &str = "/api/indicator/delete";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}")]
    Status { status: u16 },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Whether the server rejected the caller's credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403 })
    }
}

/// Hex-encoded MD5 digest of `password`, as the `/login` endpoint expects.
///
/// MD5 without a salt is weak; this mirrors the backend contract and is not a
/// substitute for TLS.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let digest = Md5::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Credential and single-sign-on exchange.
#[async_trait(?Send)]
pub trait SessionApi {
    /// Exchange account + password for a session. Single attempt, no retry.
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    /// Exchange an externally issued token for a session.
    async fn sso_login(&self, token: &str, user_id: &str) -> Result<Session, ApiError>;
}

#[async_trait(?Send)]
pub trait MenuApi {
    async fn get_tree(&self) -> Result<Vec<MenuNode>, ApiError>;
}

/// Lookup tables (`{value, label}` lists) keyed by configuration name.
#[async_trait(?Send)]
pub trait ConfigApi {
    async fn get_options(&self, key: &str) -> Result<Vec<ConfigOption>, ApiError>;
}

#[async_trait(?Send)]
pub trait IndicatorApi {
    async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError>;

    /// Create (empty or temporary id) or update an indicator; returns the stored row.
    async fn save_indicator(&self, indicator: &Indicator) -> Result<Indicator, ApiError>;

    async fn delete_indicator(&self, id: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of every API trait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &AppConfig) -> Self {
        Self { base_url: config.api_base_url.clone(), token: None }
    }

    /// Attach a bearer token to every subsequent request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Client carrying whatever token `sessions` holds right now. Build one per
    /// request so a token saved by a re-login is picked up.
    pub fn for_session<S: KeyValueStore>(config: &AppConfig, sessions: &SessionStore<S>) -> Self {
        Self::new(config).with_token(sessions.token())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(feature = "hydrate")]
mod transport {
    use gloo_net::http::{RequestBuilder, Response};
    use serde::de::DeserializeOwned;

    use super::ApiError;

    pub(super) fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn network(e: gloo_net::Error) -> ApiError {
        ApiError::Network(e.to_string())
    }

    /// Map non-2xx to [`ApiError::Status`]. A 401 on a data call means the
    /// session expired, so the global login dialog is raised.
    pub(super) fn check_status(resp: &Response, prompt_login: bool) -> Result<(), ApiError> {
        if resp.ok() {
            return Ok(());
        }
        let status = resp.status();
        if prompt_login && status == 401 {
            crate::state::dialog::open_login_dialog();
        }
        Err(ApiError::Status { status })
    }

    pub(super) async fn read_json<T: DeserializeOwned>(resp: Response, prompt_login: bool) -> Result<T, ApiError> {
        check_status(&resp, prompt_login)?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl SessionApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use super::types::{LoginRequest, LoginResponse};

            let body = LoginRequest { account: &credentials.account, password: hash_password(&credentials.password) };
            let resp = gloo_net::http::Request::post(&self.url(LOGIN_PATH))
                .json(&body)
                .map_err(transport::network)?
                .send()
                .await
                .map_err(transport::network)?;
            let body: LoginResponse = transport::read_json(resp, false).await?;
            Ok(body.into())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (credentials, self.url(LOGIN_PATH));
            Err(ApiError::Unavailable)
        }
    }

    async fn sso_login(&self, token: &str, user_id: &str) -> Result<Session, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use super::types::LoginResponse;

            let resp = gloo_net::http::Request::post(&self.url(SSO_LOGIN_PATH))
                .query([("token", token), ("userId", user_id)])
                .send()
                .await
                .map_err(transport::network)?;
            let body: LoginResponse = transport::read_json(resp, false).await?;
            Ok(body.into())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, user_id, self.url(SSO_LOGIN_PATH));
            Err(ApiError::Unavailable)
        }
    }
}

#[async_trait(?Send)]
impl MenuApi for HttpApi {
    async fn get_tree(&self) -> Result<Vec<MenuNode>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::get(&self.url(MENU_TREE_PATH));
            let resp = transport::authorize(request, self.token())
                .send()
                .await
                .map_err(transport::network)?;
            transport::read_json(resp, true).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.url(MENU_TREE_PATH);
            Err(ApiError::Unavailable)
        }
    }
}

#[async_trait(?Send)]
impl ConfigApi for HttpApi {
    async fn get_options(&self, key: &str) -> Result<Vec<ConfigOption>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::get(&self.url(CONFIG_OPTIONS_PATH)).query([("key", key)]);
            let resp = transport::authorize(request, self.token())
                .send()
                .await
                .map_err(transport::network)?;
            transport::read_json(resp, true).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, self.url(CONFIG_OPTIONS_PATH));
            Err(ApiError::Unavailable)
        }
    }
}

#[async_trait(?Send)]
impl IndicatorApi for HttpApi {
    async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::get(&self.url(INDICATOR_LIST_PATH));
            let resp = transport::authorize(request, self.token())
                .send()
                .await
                .map_err(transport::network)?;
            transport::read_json(resp, true).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.url(INDICATOR_LIST_PATH);
            Err(ApiError::Unavailable)
        }
    }

    async fn save_indicator(&self, indicator: &Indicator) -> Result<Indicator, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::post(&self.url(INDICATOR_SAVE_PATH));
            let resp = transport::authorize(request, self.token())
                .json(indicator)
                .map_err(transport::network)?
                .send()
                .await
                .map_err(transport::network)?;
            transport::read_json(resp, true).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (indicator, self.url(INDICATOR_SAVE_PATH));
            Err(ApiError::Unavailable)
        }
    }

    async fn delete_indicator(&self, id: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::post(&self.url(INDICATOR_DELETE_PATH)).query([("id", id)]);
            let resp = transport::authorize(request, self.token())
                .send()
                .await
                .map_err(transport::network)?;
            transport::check_status(&resp, true)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, self.url(INDICATOR_DELETE_PATH));
            Err(ApiError::Unavailable)
        }
    }
}
