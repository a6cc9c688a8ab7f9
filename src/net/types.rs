//! Wire DTOs for the admin REST API plus the client-side session model.
//!
//! DESIGN
//! ======
//! The backend uses PascalCase/`F_`-prefixed field names for auth payloads and
//! camelCase elsewhere. Those names are confined to the wire structs here;
//! the rest of the crate works with [`Session`] and [`SessionUser`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Credentials collected by the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

/// User record persisted next to the token, serialized as `{id, name, account, avatar}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub account: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The authenticated (token, user) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Request body for `POST /login`. `password` is already hashed.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub account: &'a str,
    pub password: String,
}

/// Response body shared by `/login` and `/api/token/sso-login`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "UserInfo")]
    pub user_info: WireUserInfo,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WireUserInfo {
    #[serde(rename = "F_UserId", deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(rename = "F_Account")]
    pub account: String,
    #[serde(rename = "F_RealName", default)]
    pub real_name: Option<String>,
    #[serde(rename = "F_HeadIcon", default)]
    pub head_icon: Option<String>,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        let info = resp.user_info;
        let name = info
            .real_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| info.account.clone());
        Self {
            token: resp.token,
            user: SessionUser {
                id: info.user_id,
                name,
                account: info.account,
                avatar: info.head_icon.filter(|a| !a.is_empty()),
            },
        }
    }
}

/// A node of the navigation menu tree returned by `getTree`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

/// One `{value, label}` entry of a cached configuration lookup table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigOption {
    pub value: serde_json::Value,
    pub label: String,
}

/// Indicator row as listed and edited on the indicator management page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub remark: String,
}

fn default_enabled() -> bool {
    true
}

/// Accept identifiers encoded either as JSON strings or integers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
