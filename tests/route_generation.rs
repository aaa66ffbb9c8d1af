//! End-to-end generation passes over realistic configurations.

use std::time::Duration;

use regex::Regex;
use route_generator::config::load_config;
use route_generator::routegen::{
    generate_from_config, generate_route_table, health_check_generators, FixedClusterResolver,
    JsonSink, MemorySink, RouteSink, RouteTable,
};
use route_generator::routing::{
    GenerationError, HttpMethod, ParseError, PathMatch, RouteDescriptor, DEFAULT_RESPONSE_DEADLINE,
};

mod common;

/// First route whose method and path match, the way the proxy evaluates the table.
fn dispatch<'a>(table: &'a RouteTable, method: HttpMethod, path: &str) -> Option<&'a RouteDescriptor> {
    table.routes.iter().find(|r| {
        r.method == method
            && match &r.path_match {
                PathMatch::Exact(p) => p == path,
                PathMatch::Regex(re) => Regex::new(re).unwrap().is_match(path),
            }
    })
}

#[test]
fn test_bookstore_route_order() {
    let table = generate_from_config(&common::bookstore_config()).unwrap();

    let ops: Vec<_> = table.routes.iter().map(|r| r.operation.as_str()).collect();
    assert_eq!(
        ops,
        vec![
            "myapi.endpoints.example.com.Autogen_HealthCheck",
            "bookstore.endpoints.example.com.ListShelves",
            "bookstore.endpoints.example.com.CreateShelf",
            "bookstore.endpoints.example.com.GetBook",
            "bookstore.endpoints.example.com.GetResource",
        ]
    );
    assert!(table
        .routes
        .iter()
        .all(|r| r.cluster == "backend-cluster-bookstore.endpoints.example.com_local"));
}

#[test]
fn test_health_check_route() {
    let table = generate_from_config(&common::bookstore_config()).unwrap();
    let health = table
        .find_operation("myapi.endpoints.example.com.Autogen_HealthCheck")
        .unwrap();

    assert_eq!(health.method, HttpMethod::Get);
    assert_eq!(health.path_match, PathMatch::Exact("/status".to_string()));
    assert_eq!(health.timeout, DEFAULT_RESPONSE_DEADLINE);
}

#[test]
fn test_dispatch_prefers_specific_routes() {
    let table = generate_from_config(&common::bookstore_config()).unwrap();

    let op = |method, path| dispatch(&table, method, path).map(|r| r.operation.as_str());
    assert_eq!(op(HttpMethod::Get, "/status"), Some("myapi.endpoints.example.com.Autogen_HealthCheck"));
    assert_eq!(op(HttpMethod::Get, "/v1/shelves"), Some("bookstore.endpoints.example.com.ListShelves"));
    assert_eq!(op(HttpMethod::Post, "/v1/shelves"), Some("bookstore.endpoints.example.com.CreateShelf"));
    assert_eq!(
        op(HttpMethod::Get, "/v1/shelves/s1/books/b1"),
        Some("bookstore.endpoints.example.com.GetBook")
    );
    assert_eq!(
        op(HttpMethod::Get, "/v1/shelves/s1"),
        Some("bookstore.endpoints.example.com.GetResource")
    );
    assert_eq!(op(HttpMethod::Delete, "/v1/shelves"), None);
    assert_eq!(op(HttpMethod::Post, "/status"), None);
}

#[test]
fn test_rule_deadline_applied() {
    let table = generate_from_config(&common::bookstore_config()).unwrap();
    let resource = table
        .find_operation("bookstore.endpoints.example.com.GetResource")
        .unwrap();
    assert_eq!(resource.timeout, Duration::from_secs(30));
}

#[test]
fn test_health_check_disabled() {
    let mut config = common::bookstore_config();
    config.options.healthz.clear();

    let table = generate_from_config(&config).unwrap();
    assert_eq!(table.len(), 4);
    assert!(table.routes.iter().all(|r| !r.operation.ends_with("_HealthCheck")));
}

#[test]
fn test_health_check_only() {
    let mut config = common::bookstore_config();
    config.options.healthz = "/status".to_string();
    config.service.http_rules.clear();

    let generators = health_check_generators(
        &config.options,
        &FixedClusterResolver("backend-cluster".to_string()),
    );
    let table = generate_route_table(&generators).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.routes[0].operation, "myapi.endpoints.example.com.Autogen_HealthCheck");
    assert_eq!(table.routes[0].cluster, "backend-cluster");
}

#[test]
fn test_malformed_health_path_aborts_pass() {
    let mut config = common::bookstore_config();
    config.options.healthz = "/a/**/b".to_string();

    assert!(matches!(
        generate_from_config(&config),
        Err(GenerationError::Parse(ParseError::MultiSegmentNotLast { .. }))
    ));
}

#[test]
fn test_operation_collision_aborts_pass() {
    let mut config = common::bookstore_config();
    config.service.name = "myapi.endpoints.example.com".to_string();
    config.service.http_rules[0].selector = "Autogen_HealthCheck".to_string();

    assert_eq!(
        generate_from_config(&config),
        Err(GenerationError::DuplicateOperation(
            "myapi.endpoints.example.com.Autogen_HealthCheck".to_string()
        ))
    );
}

#[test]
fn test_health_path_colliding_with_rule_aborts_pass() {
    let mut config = common::bookstore_config();
    config.options.healthz = "/v1/shelves".to_string();

    assert_eq!(
        generate_from_config(&config),
        Err(GenerationError::DuplicatePattern {
            pattern: "GET /v1/shelves".to_string(),
            first: "myapi.endpoints.example.com.Autogen_HealthCheck".to_string(),
            second: "bookstore.endpoints.example.com.ListShelves".to_string(),
        })
    );

    // A different method on the same path is a distinct route.
    config.service.http_rules.retain(|r| r.method != HttpMethod::Get || r.path != "/v1/shelves");
    let table = generate_from_config(&config).unwrap();
    assert_eq!(
        dispatch(&table, HttpMethod::Get, "/v1/shelves").map(|r| r.operation.as_str()),
        Some("myapi.endpoints.example.com.Autogen_HealthCheck")
    );
    assert_eq!(
        dispatch(&table, HttpMethod::Post, "/v1/shelves").map(|r| r.operation.as_str()),
        Some("bookstore.endpoints.example.com.CreateShelf")
    );
}

#[test]
fn test_capturing_health_path_does_not_shadow_literal_rule() {
    let mut config = common::bookstore_config();
    config.options.healthz = "/v1/{target}".to_string();
    let table = generate_from_config(&config).unwrap();

    let op = |path| dispatch(&table, HttpMethod::Get, path).map(|r| r.operation.as_str());
    assert_eq!(op("/v1/shelves"), Some("bookstore.endpoints.example.com.ListShelves"));
    assert_eq!(op("/v1/anything"), Some("myapi.endpoints.example.com.Autogen_HealthCheck"));
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate_from_config(&common::bookstore_config()).unwrap();
    let b = generate_from_config(&common::bookstore_config()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_json_sink_output() {
    let table = generate_from_config(&common::bookstore_config()).unwrap();

    let mut sink = JsonSink::new(Vec::new());
    sink.emit(&table).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();

    let first = &value["routes"][0];
    assert_eq!(first["method"], "GET");
    assert_eq!(first["path_match"]["exact"], "/status");
    assert_eq!(first["cluster"], "backend-cluster-bookstore.endpoints.example.com_local");
    assert_eq!(first["timeout"], serde_json::json!(15.0));

    let last = &value["routes"][4];
    assert_eq!(last["template"], "/v1/{name=**}");
    assert_eq!(last["path_match"]["regex"], "^/v1/.+$");
}

#[test]
fn test_memory_sink_keeps_each_pass() {
    let mut sink = MemorySink::default();
    sink.emit(&generate_from_config(&common::bookstore_config()).unwrap()).unwrap();
    sink.emit(&RouteTable::default()).unwrap();
    assert_eq!(sink.tables.len(), 2);
    assert_eq!(sink.tables[0].len(), 5);
}

#[test]
fn test_load_from_disk_and_generate() {
    let path = common::write_temp_config("disk", common::BOOKSTORE_TOML);
    let config = load_config(&path).unwrap();
    let table = generate_from_config(&config).unwrap();
    assert_eq!(table.len(), 5);
    let _ = std::fs::remove_file(&path);
}
