//! In-memory fakes shared by controller tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;

use crate::net::api::{ApiError, ConfigApi, IndicatorApi, MenuApi, SessionApi};
use crate::net::types::{ConfigOption, Credentials, Indicator, MenuNode, Session, SessionUser};
use crate::state::session::SessionStore;
use crate::util::storage::MemoryStore;

pub fn sample_session() -> Session {
    Session {
        token: "tok-123".to_owned(),
        user: SessionUser {
            id: "u-1".to_owned(),
            name: "Alice".to_owned(),
            account: "alice".to_owned(),
            avatar: None,
        },
    }
}

/// Session adapter plus handles on its two underlying stores.
pub fn memory_sessions() -> (SessionStore<MemoryStore>, MemoryStore, MemoryStore) {
    let session = MemoryStore::new();
    let persistent = MemoryStore::new();
    (SessionStore::new(session.clone(), persistent.clone()), session, persistent)
}

/// Records every path handed to it.
#[derive(Default)]
pub struct RecordingNavigator {
    pub paths: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn navigate(&self, path: &str) {
        self.paths.borrow_mut().push(path.to_owned());
    }

    pub fn visited(&self) -> Vec<String> {
        self.paths.borrow().clone()
    }
}

pub struct FakeSessionApi {
    pub result: Result<Session, ApiError>,
    pub login_calls: Cell<usize>,
    pub sso_calls: RefCell<Vec<(String, String)>>,
    pub last_credentials: RefCell<Option<Credentials>>,
}

impl FakeSessionApi {
    pub fn succeeding() -> Self {
        Self::with_result(Ok(sample_session()))
    }

    pub fn failing(err: ApiError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<Session, ApiError>) -> Self {
        Self {
            result,
            login_calls: Cell::new(0),
            sso_calls: RefCell::new(Vec::new()),
            last_credentials: RefCell::new(None),
        }
    }
}

#[async_trait(?Send)]
impl SessionApi for FakeSessionApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.login_calls.set(self.login_calls.get() + 1);
        *self.last_credentials.borrow_mut() = Some(credentials.clone());
        self.result.clone()
    }

    async fn sso_login(&self, token: &str, user_id: &str) -> Result<Session, ApiError> {
        self.sso_calls.borrow_mut().push((token.to_owned(), user_id.to_owned()));
        self.result.clone()
    }
}

/// Replays scripted responses, then repeats `fallback`.
pub struct ScriptedMenuApi {
    pub script: RefCell<VecDeque<Result<Vec<MenuNode>, ApiError>>>,
    pub fallback: Result<Vec<MenuNode>, ApiError>,
    pub calls: Cell<usize>,
}

impl ScriptedMenuApi {
    pub fn new(script: Vec<Result<Vec<MenuNode>, ApiError>>, fallback: Result<Vec<MenuNode>, ApiError>) -> Self {
        Self { script: RefCell::new(script.into()), fallback, calls: Cell::new(0) }
    }

    pub fn always(result: Result<Vec<MenuNode>, ApiError>) -> Self {
        Self::new(Vec::new(), result)
    }
}

#[async_trait(?Send)]
impl MenuApi for ScriptedMenuApi {
    async fn get_tree(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.calls.set(self.calls.get() + 1);
        let next = self.script.borrow_mut().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn menu_leaf(id: &str, name: &str, path: &str) -> MenuNode {
    MenuNode {
        id: id.to_owned(),
        name: name.to_owned(),
        path: Some(path.to_owned()),
        icon: None,
        children: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeConfigApi {
    pub tables: Vec<(String, Vec<ConfigOption>)>,
    pub calls: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl ConfigApi for FakeConfigApi {
    async fn get_options(&self, key: &str) -> Result<Vec<ConfigOption>, ApiError> {
        self.calls.borrow_mut().push(key.to_owned());
        self.tables
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, options)| options.clone())
            .ok_or(ApiError::Status { status: 404 })
    }
}

pub struct FakeIndicatorApi {
    pub save_result: Result<Indicator, ApiError>,
    pub delete_result: Result<(), ApiError>,
    pub saved: RefCell<Vec<Indicator>>,
    pub deleted: RefCell<Vec<String>>,
}

impl FakeIndicatorApi {
    pub fn new(save_result: Result<Indicator, ApiError>) -> Self {
        Self {
            save_result,
            delete_result: Ok(()),
            saved: RefCell::new(Vec::new()),
            deleted: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl IndicatorApi for FakeIndicatorApi {
    async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError> {
        Ok(self.saved.borrow().clone())
    }

    async fn save_indicator(&self, indicator: &Indicator) -> Result<Indicator, ApiError> {
        self.saved.borrow_mut().push(indicator.clone());
        self.save_result.clone()
    }

    async fn delete_indicator(&self, id: &str) -> Result<(), ApiError> {
        self.deleted.borrow_mut().push(id.to_owned());
        self.delete_result.clone()
    }
}

pub fn option(value: serde_json::Value, label: &str) -> ConfigOption {
    ConfigOption { value, label: label.to_owned() }
}
