//! Shared fixtures for integration tests.

use std::path::PathBuf;

use route_generator::config::{parse_config, RouteGenConfig};

pub const BOOKSTORE_TOML: &str = r#"
[options]
healthz = "/status"
health_check_operation_prefix = "Autogen"
health_check_operation = "myapi.endpoints.example.com"

[service]
name = "bookstore.endpoints.example.com"

[[service.http_rules]]
selector = "GetBook"
method = "GET"
path = "/v1/shelves/{shelf}/books/{book}"

[[service.http_rules]]
selector = "ListShelves"
method = "GET"
path = "/v1/shelves"

[[service.http_rules]]
selector = "GetResource"
method = "GET"
path = "/v1/{name=**}"
deadline_secs = 30.0

[[service.http_rules]]
selector = "CreateShelf"
method = "POST"
path = "v1/shelves"
"#;

pub fn bookstore_config() -> RouteGenConfig {
    parse_config(BOOKSTORE_TOML).unwrap()
}

/// Write `contents` to a per-test file under the system temp dir.
#[allow(dead_code)]
pub fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("routegen-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}
