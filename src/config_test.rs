use super::*;

#[test]
fn normalize_base_url_strips_trailing_slashes() {
    assert_eq!(normalize_base_url("https://api.example.test/"), "https://api.example.test");
    assert_eq!(normalize_base_url("  /gateway//  "), "/gateway");
    assert_eq!(normalize_base_url(""), "");
}

#[test]
fn endpoint_joins_without_double_slash() {
    let config = AppConfig { api_base_url: "https://api.example.test".to_owned(), ..AppConfig::default() };
    assert_eq!(config.endpoint("/login"), "https://api.example.test/login");
    assert_eq!(config.endpoint("api/menu/getTree"), "https://api.example.test/api/menu/getTree");
}

#[test]
fn endpoint_with_empty_base_is_root_relative() {
    let config = AppConfig { api_base_url: String::new(), ..AppConfig::default() };
    assert_eq!(config.endpoint("/login"), "/login");
}

#[test]
fn default_paths() {
    let config = AppConfig::default();
    assert_eq!(config.landing_path, "/");
    assert_eq!(config.login_path, "/login");
}

#[test]
fn parse_port_defaults_and_overrides() {
    assert_eq!(parse_port(None), DEFAULT_PORT);
    assert_eq!(parse_port(Some("8080")), 8080);
    assert_eq!(parse_port(Some(" 9000 ")), 9000);
    assert_eq!(parse_port(Some("abc")), DEFAULT_PORT);
    assert_eq!(parse_port(Some("0")), DEFAULT_PORT);
    assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
}
