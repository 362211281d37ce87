use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use keepalive::config::{ClientConfig, ServerConfig, Target};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_server_config_defaults() {
    let cfg = ServerConfig::load_from(vars(&[])).unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.root, PathBuf::from("files"));
    assert_eq!(cfg.idle_timeout(), Duration::from_secs(10));
    assert!(cfg.redirects.is_empty());
}

#[test]
fn test_server_config_env_overrides() {
    let cfg = ServerConfig::load_from(vars(&[("SERVE_ROOT", "/srv/www"), ("IDLE_TIMEOUT", "3")]))
        .unwrap();

    assert_eq!(cfg.root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.idle_timeout(), Duration::from_secs(3));
}

#[test]
fn test_server_config_bad_timeout() {
    let result = ServerConfig::load_from(vars(&[("IDLE_TIMEOUT", "soon")]));

    assert!(result.is_err());
}

#[test]
fn test_server_config_from_yaml() {
    let yaml = r#"
port: 9000
root: public
redirects:
  /redirect.html: /result.html
"#;
    let cfg = ServerConfig::from_yaml(yaml).unwrap();

    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.root, PathBuf::from("public"));
    assert_eq!(cfg.idle_timeout_secs, 10);
    assert_eq!(
        cfg.redirects.get("/redirect.html").map(String::as_str),
        Some("/result.html")
    );
}

#[test]
fn test_server_config_missing_file() {
    let result = ServerConfig::load_from(vars(&[("SERVER_CONFIG", "/nonexistent/keepalive.yaml")]));

    assert!(result.is_err());
}

#[test]
fn test_client_config_download_dir() {
    let target = Target::new("127.0.0.1", 8080);
    let cfg = ClientConfig::load_from(target.clone(), vars(&[("DOWNLOAD_DIR", "/tmp/dl")]));

    assert_eq!(cfg.target, target);
    assert_eq!(cfg.download_dir, PathBuf::from("/tmp/dl"));
}

#[test]
fn test_target_display() {
    assert_eq!(Target::new("localhost", 8080).to_string(), "localhost:8080");
}
