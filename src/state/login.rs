//! Login form controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the account/password/remember fields and the submit state machine
//! (`Idle -> Submitting -> Success | Failed`). The page component keeps a
//! `LoginForm` in an `RwSignal` and drives it through `begin_submit` /
//! `finish_submit` around the async [`complete_login`] call; [`LoginForm::submit`]
//! runs the same sequence in one call.
//!
//! ERROR HANDLING
//! ==============
//! Blank fields fail locally and never reach the network. Any API failure is
//! logged with its detail and shown to the user as one generic message.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::net::api::{ApiError, SessionApi};
use crate::net::types::{Credentials, Session};
use crate::state::session::SessionStore;
use crate::util::redirect::navigate_after_login;
use crate::util::storage::KeyValueStore;

pub const LOGIN_FAILED_MESSAGE: &str = "login failed, check credentials";
pub const SSO_FAILED_MESSAGE: &str = "single sign-on failed, sign in with a password instead";
pub const SSO_INCOMPLETE_MESSAGE: &str = "The sign-on link is incomplete.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("account and password required")]
    MissingCredentials,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub account: String,
    pub password: String,
    pub remember: bool,
    pub phase: LoginPhase,
    /// User-facing message; never the raw API error.
    pub error: Option<String>,
}

impl LoginForm {
    pub fn update_account(&mut self, value: String) {
        self.account = value;
        self.error = None;
    }

    pub fn update_password(&mut self, value: String) {
        self.password = value;
        self.error = None;
    }

    pub fn update_remember(&mut self, remember: bool) {
        self.remember = remember;
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == LoginPhase::Submitting
    }

    /// Check that both fields have non-whitespace content.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCredentials`] when either field is blank.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        let account = self.account.trim();
        if account.is_empty() || self.password.trim().is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(Credentials {
            account: account.to_owned(),
            password: self.password.clone(),
            remember: self.remember,
        })
    }

    /// Validate and enter `Submitting`. Returns the credentials to send, or
    /// `None` if a submit is already in flight or validation failed (in which
    /// case `error` is set).
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.is_submitting() {
            return None;
        }
        match self.validate() {
            Ok(credentials) => {
                self.phase = LoginPhase::Submitting;
                self.error = None;
                Some(credentials)
            }
            Err(e) => {
                self.phase = LoginPhase::Failed;
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Leave `Submitting` according to `result`. Always called once per
    /// successful `begin_submit`, whatever the outcome.
    pub fn finish_submit<T>(&mut self, result: &Result<T, ApiError>) {
        match result {
            Ok(_) => {
                self.phase = LoginPhase::Success;
                self.error = None;
                self.password.clear();
            }
            Err(e) => {
                log::warn!("login for {} failed: {e}", self.account.trim());
                self.phase = LoginPhase::Failed;
                self.error = Some(LOGIN_FAILED_MESSAGE.to_owned());
            }
        }
    }

    /// Validate, log in, persist the session and navigate.
    pub async fn submit<A, S, F>(&mut self, api: &A, sessions: &SessionStore<S>, default_path: &str, navigate: F)
    where
        A: SessionApi + ?Sized,
        S: KeyValueStore,
        F: FnOnce(&str),
    {
        let Some(credentials) = self.begin_submit() else {
            return;
        };
        let result = complete_login(api, sessions, credentials, default_path, navigate).await;
        self.finish_submit(&result);
    }
}

/// Call the API, save the session pair to the store picked by `remember`, then
/// navigate to the pending target or `default_path`.
///
/// # Errors
///
/// Returns the API error unchanged; nothing is stored or navigated on failure.
pub async fn complete_login<A, S, F>(
    api: &A,
    sessions: &SessionStore<S>,
    credentials: Credentials,
    default_path: &str,
    navigate: F,
) -> Result<Session, ApiError>
where
    A: SessionApi + ?Sized,
    S: KeyValueStore,
    F: FnOnce(&str),
{
    let session = api.login(&credentials).await?;
    sessions.save(&session, credentials.remember);
    navigate_after_login(sessions, default_path, navigate);
    Ok(session)
}

/// Re-login from the session-expired dialog. The new pair goes to the store
/// the old one was in; the caller stays on the current page.
///
/// # Errors
///
/// Returns the API error unchanged; the stored session is untouched on failure.
pub async fn complete_relogin<A, S>(api: &A, sessions: &SessionStore<S>, credentials: &Credentials) -> Result<Session, ApiError>
where
    A: SessionApi + ?Sized,
    S: KeyValueStore,
{
    let remember = sessions.is_remembered();
    let session = api.login(credentials).await?;
    sessions.save(&session, remember);
    Ok(session)
}

/// Single-sign-on variant of [`complete_login`]. SSO sessions live in the
/// session-scoped store only.
///
/// # Errors
///
/// Returns the API error unchanged; nothing is stored or navigated on failure.
pub async fn complete_sso_login<A, S, F>(
    api: &A,
    sessions: &SessionStore<S>,
    token: &str,
    user_id: &str,
    default_path: &str,
    navigate: F,
) -> Result<Session, ApiError>
where
    A: SessionApi + ?Sized,
    S: KeyValueStore,
    F: FnOnce(&str),
{
    let session = api.sso_login(token, user_id).await?;
    sessions.save(&session, false);
    navigate_after_login(sessions, default_path, navigate);
    Ok(session)
}

/// Progress of the `/sso` token exchange as shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SsoStatus {
    #[default]
    Pending,
    MissingParams,
    Failed,
}

impl SsoStatus {
    /// Status after an exchange attempt; `None` once signed in. The error
    /// detail goes to the log only.
    pub fn after_attempt<T>(result: &Result<T, ApiError>) -> Option<Self> {
        match result {
            Ok(_) => None,
            Err(e) => {
                log::warn!("sso login failed: {e}");
                Some(Self::Failed)
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Pending => "Signing you in...",
            Self::MissingParams => SSO_INCOMPLETE_MESSAGE,
            Self::Failed => SSO_FAILED_MESSAGE,
        }
    }
}
