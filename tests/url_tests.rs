//! Integration tests for URL building, parameter extraction, root handling
//! and route queries through the public router API.

use pollster::block_on;
use std::sync::Arc;
use wayfinder::{
    HistoryRelay, HookResult, MemoryHistory, NavigateOptions, Route, RouteParams, Router,
    RouterOptions,
};

fn noop_route() -> Route {
    Route::new().on_execute(|_| async { HookResult::Continue })
}

fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn url_for_round_trips_named_parameters() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("user-edit", "users/:id/edit", noop_route())
        .unwrap();

    let url = router.url_for("user-edit", &params(&[("id", "42")]));
    assert_eq!(url, "users/42/edit");

    let result = block_on(router.navigate(&url, NavigateOptions::trigger()));
    assert!(result.is_completed());
    assert_eq!(
        router.current().unwrap().parameters.get("id").map(String::as_str),
        Some("42")
    );
}

#[test]
fn blank_splat_collapses_its_segment() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("files", "files(/*path)", noop_route())
        .unwrap();

    assert_eq!(router.url_for("files", &RouteParams::new()), "files");
    assert_eq!(
        router.url_for("files", &params(&[("path", "a/b")])),
        "files/a/b"
    );
}

#[test]
fn optional_group_matches_both_forms() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("docs", "docs(/:page)", noop_route())
        .unwrap();

    let result = block_on(router.navigate("docs", NavigateOptions::trigger()));
    assert!(result.is_completed());
    assert_eq!(router.current().unwrap().parameters.get("page"), None);

    let result = block_on(router.navigate("docs/intro", NavigateOptions::trigger()));
    assert!(result.is_completed());
    assert_eq!(
        router.current().unwrap().parameters.get("page").map(String::as_str),
        Some("intro")
    );
}

#[test]
fn params_marker_carries_a_serialized_bucket() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("search", "search(/*params)", noop_route())
        .unwrap();

    let url = router.url_for("search", &params(&[("q", "rust"), ("sort", "date")]));
    assert_eq!(url, "search/q:rust+sort:date");

    block_on(router.navigate(&url, NavigateOptions::trigger()));
    let current = router.current().unwrap();
    assert_eq!(current.parameters.get("q").map(String::as_str), Some("rust"));
    assert_eq!(
        current.parameters.get("sort").map(String::as_str),
        Some("date")
    );
}

#[test]
fn router_defaults_fill_missing_parameters() {
    let options = RouterOptions::new().with_defaults(params(&[("lang", "en")]));
    let mut router = Router::new(options);
    router
        .route_named("page", ":lang/page/:slug", noop_route())
        .unwrap();

    assert_eq!(
        router.url_for("page", &params(&[("slug", "about")])),
        "en/page/about"
    );

    block_on(router.navigate("fr/page/about", NavigateOptions::trigger()));
    assert_eq!(
        router.current().unwrap().parameters.get("lang").map(String::as_str),
        Some("fr")
    );
}

#[test]
fn unknown_name_yields_the_root_alone() {
    let options = RouterOptions::new().with_root("app");
    let router = Router::new(options);
    assert_eq!(router.url_for("nowhere", &RouteParams::new()), "app");
}

#[test]
fn root_is_composed_onto_urls_and_stripped_from_fragments() {
    let options = RouterOptions::new().with_root("app");
    let mut router = Router::new(options);
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    let url = router.url_for("user", &params(&[("id", "7")]));
    assert_eq!(url, "app/users/7");

    let result = block_on(router.navigate("app/users/7", NavigateOptions::trigger()));
    assert!(result.is_completed());
    let current = router.current().unwrap();
    assert_eq!(current.parameters.get("id").map(String::as_str), Some("7"));
    assert_eq!(current.url, "app/users/7");
}

#[test]
fn navigate_to_builds_and_dispatches() {
    let history = Arc::new(MemoryHistory::new());
    let mut router = Router::with_history(RouterOptions::new(), history.clone());
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    let result = block_on(router.navigate_to(
        "user",
        &params(&[("id", "7")]),
        NavigateOptions::trigger(),
    ));

    assert!(result.is_completed());
    assert_eq!(history.fragment(), "users/7");
    assert_eq!(router.current().unwrap().name, "user");
}

#[test]
fn path_prefix_applies_to_every_template() {
    let options = RouterOptions::new().with_path("admin");
    let mut router = Router::new(options);
    router.route_named("users", "users", noop_route()).unwrap();
    router.route_named("home", "", noop_route()).unwrap();

    assert_eq!(router.template_of("users"), Some("admin/users"));
    assert_eq!(router.template_of("home"), Some("admin"));

    let result = block_on(router.navigate("admin/users", NavigateOptions::trigger()));
    assert!(result.is_completed());
}

#[test]
fn matches_url_compares_exactly() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    assert!(router.matches_url(""));

    block_on(router.navigate("users/1", NavigateOptions::trigger()));
    assert!(router.matches_url("users/1"));
    assert!(!router.matches_url("users"));
    assert!(router.matches_route("user", &params(&[("id", "1")])));
    assert!(!router.matches_route("user", &params(&[("id", "2")])));
}

#[test]
fn navigation_without_trigger_only_updates_location() {
    let history = Arc::new(MemoryHistory::new());
    let mut router = Router::with_history(RouterOptions::new(), history.clone());
    router.route_named("users", "users", noop_route()).unwrap();

    let result = block_on(router.navigate("users", NavigateOptions::default()));

    assert!(result.is_completed());
    assert_eq!(history.fragment(), "users");
    assert!(router.current().is_none());
}

#[test]
fn stopped_router_updates_location_but_not_state() {
    let history = Arc::new(MemoryHistory::new());
    let mut router = Router::with_history(RouterOptions::new(), history.clone());
    router.route_named("users", "users", noop_route()).unwrap();

    router.stop();
    let result = block_on(router.navigate("users", NavigateOptions::trigger()));

    assert!(result.is_unhandled());
    assert_eq!(history.fragment(), "users");
    assert!(router.current().is_none());

    router.start();
    let result = block_on(router.navigate("users", NavigateOptions::trigger()));
    assert!(result.is_completed());
    assert_eq!(router.current().unwrap().name, "users");
}

#[test]
fn registration_order_decides_between_overlapping_templates() {
    let mut router = Router::new(RouterOptions::new());
    router
        .route_named("special", "users/new", noop_route())
        .unwrap();
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    block_on(router.navigate("users/new", NavigateOptions::trigger()));
    assert_eq!(router.current().unwrap().name, "special");

    block_on(router.navigate("users/7", NavigateOptions::trigger()));
    assert_eq!(router.current().unwrap().name, "user");
}

#[test]
fn unmatched_fragment_is_unhandled() {
    let mut router = Router::new(RouterOptions::new());
    router.route_named("users", "users", noop_route()).unwrap();

    let result = block_on(router.navigate("nonsense/path", NavigateOptions::trigger()));
    assert!(result.is_unhandled());
    assert!(router.current().is_none());
}

#[test]
fn templates_register_with_the_history_relay() {
    let history = Arc::new(MemoryHistory::new());
    let mut router = Router::with_history(RouterOptions::new(), history.clone());
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    assert_eq!(
        history.registered(),
        vec![(Some("user".to_string()), "users/:id".to_string())]
    );
}

#[test]
fn history_registration_can_be_disabled() {
    let history = Arc::new(MemoryHistory::new());
    let options = RouterOptions::new().with_history(false);
    let mut router = Router::with_history(options, history.clone());
    router
        .route_named("user", "users/:id", noop_route())
        .unwrap();

    assert!(history.registered().is_empty());
}
