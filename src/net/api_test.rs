use super::*;
use crate::test_support::{memory_sessions, sample_session};

#[test]
fn hash_password_is_lowercase_md5_hex() {
    assert_eq!(hash_password("123456"), "e10adc3949ba59abbe56e057f20f883e");
    assert_eq!(hash_password("password"), "5f4dcc3b5aa765d61d8327deb882cf99");
    assert_eq!(hash_password(""), "d41d8cd98f00b204e9800998ecf8427e");
}

#[test]
fn http_api_builds_urls_from_base() {
    let config = AppConfig { api_base_url: "https://api.example.test".to_owned(), ..AppConfig::default() };
    let api = HttpApi::new(&config);
    assert_eq!(api.url(LOGIN_PATH), "https://api.example.test/login");
    assert_eq!(api.url(SSO_LOGIN_PATH), "https://api.example.test/api/token/sso-login");
    assert_eq!(api.url(MENU_TREE_PATH), "https://api.example.test/api/menu/getTree");
}

#[test]
fn with_token_ignores_empty_tokens() {
    let api = HttpApi::new(&AppConfig::default());
    assert_eq!(api.clone().with_token(Some("abc".to_owned())).token(), Some("abc"));
    assert_eq!(api.clone().with_token(Some(String::new())).token(), None);
    assert_eq!(api.with_token(None).token(), None);
}

#[test]
fn for_session_reads_the_current_token() {
    let config = AppConfig::default();
    let (sessions, _, _) = memory_sessions();
    assert_eq!(HttpApi::for_session(&config, &sessions).token(), None);

    sessions.save(&sample_session(), false);
    assert_eq!(HttpApi::for_session(&config, &sessions).token(), Some("tok-123"));

    let renewed = Session { token: "tok-456".to_owned(), ..sample_session() };
    sessions.save(&renewed, true);
    assert_eq!(HttpApi::for_session(&config, &sessions).token(), Some("tok-456"));
}

#[test]
fn unauthorized_detection_only_matches_auth_statuses() {
    assert!(ApiError::Status { status: 401 }.is_unauthorized());
    assert!(ApiError::Status { status: 403 }.is_unauthorized());
    assert!(!ApiError::Status { status: 500 }.is_unauthorized());
    assert!(!ApiError::Network("offline".to_owned()).is_unauthorized());
}

#[test]
fn api_error_messages() {
    assert_eq!(ApiError::Status { status: 502 }.to_string(), "request failed with status 502");
    assert_eq!(ApiError::Network("reset".to_owned()).to_string(), "network error: reset");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn http_api_is_unavailable_outside_the_browser() {
    let api = HttpApi::new(&AppConfig::default());
    let result = futures::executor::block_on(api.get_tree());
    assert_eq!(result, Err(ApiError::Unavailable));
}
