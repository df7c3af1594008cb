//! Integration tests for hierarchy queries and nested sections through the
//! public router API.

use pollster::block_on;
use wayfinder::{
    HookResult, NavigateOptions, Route, RouteParams, Router, RouterOptions,
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

/// A small catalogue of user routes forming a three-level tree.
fn user_tree() -> Router {
    let mut router = Router::new(RouterOptions::new());
    router.route_named("users", "users", noop_route()).unwrap();
    router
        .route_named("users.show", "users/:id", noop_route())
        .unwrap();
    router
        .route_named("users.active", "users/active", noop_route())
        .unwrap();
    router
        .route_named("users.show.documents", "users/:id/documents", noop_route())
        .unwrap();
    router
        .route_named(
            "users.show.documents.detail",
            "users/:id/documents/:doc",
            noop_route(),
        )
        .unwrap();
    router
}

#[test]
fn ancestors_walk_root_first_with_built_urls() {
    let router = user_tree();
    let chain = router.ancestors_of("users.show", &params(&[("id", "1234")]));

    let names: Vec<&str> = chain.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["users", "users.show"]);

    let urls: Vec<&str> = chain.iter().map(|n| n.url.as_str()).collect();
    assert_eq!(urls, vec!["users", "users/1234"]);

    assert!(!chain[0].active);
    assert!(chain[1].active);
}

#[test]
fn ancestors_skip_unregistered_intermediate_names() {
    let mut router = Router::new(RouterOptions::new());
    router.route_named("a", "a", noop_route()).unwrap();
    router
        .route_named("a.b.c", "a/b/c", noop_route())
        .unwrap();

    let chain = router.ancestors_of("a.b.c", &RouteParams::new());
    let names: Vec<&str> = chain.iter().map(|n| n.name.as_str()).collect();
    // "a.b" is not registered and does not appear
    assert_eq!(names, vec!["a", "a.b.c"]);
}

#[test]
fn nodes_list_strict_descendants_in_registration_order() {
    let router = user_tree();
    let nodes = router.nodes_of("users.show", &params(&[("id", "9")]));

    let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["users.show.documents", "users.show.documents.detail"]
    );
    assert!(nodes.iter().all(|n| !n.active));
}

#[test]
fn siblings_share_a_parent_and_exclude_own_subtree() {
    let router = user_tree();
    let siblings = router.siblings_of("users.show", &params(&[("id", "9")]));

    let names: Vec<&str> = siblings.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["users.show", "users.active"]);
    assert!(siblings[0].active);
    assert!(!siblings[1].active);
}

#[test]
fn top_level_routes_have_no_siblings() {
    let router = user_tree();
    assert!(router.siblings_of("users", &RouteParams::new()).is_empty());
}

#[test]
fn queries_default_to_the_committed_route() {
    let mut router = user_tree();
    block_on(router.navigate("users/7/documents", NavigateOptions::trigger()));

    let chain = router.ancestors();
    let names: Vec<&str> = chain.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["users", "users.show", "users.show.documents"]);
    assert_eq!(chain[1].url, "users/7");

    assert!(router.is_ancestor("users"));
    assert!(router.is_ancestor("users.show"));
    assert!(!router.is_ancestor("users.show.documents"));
    assert!(!router.is_ancestor("users.active"));
}

#[test]
fn section_dispatches_subtree_urls_through_its_own_router() {
    block_on(async {
        let mut router = Router::new(RouterOptions::new());
        let section = router
            .section("settings", "settings", RouterOptions::new())
            .unwrap();
        section
            .route_named("settings.profile", "profile/:tab", noop_route())
            .await
            .unwrap();

        let result = router
            .navigate("settings/profile/security", NavigateOptions::trigger())
            .await;
        assert!(result.is_completed());

        // Parent commits the section route, sub-router commits the leaf
        assert_eq!(router.current().unwrap().name, "settings");

        let sub = section.router();
        let sub = sub.lock().await;
        let current = sub.current().unwrap();
        assert_eq!(current.name, "settings.profile");
        assert_eq!(current.parameters.get("tab").map(String::as_str), Some("security"));
    });
}

#[test]
fn section_urls_carry_the_mounted_root() {
    block_on(async {
        let mut router = Router::new(RouterOptions::new());
        let section = router
            .section("settings", "settings", RouterOptions::new())
            .unwrap();
        section
            .route_named("settings.profile", "profile/:tab", noop_route())
            .await
            .unwrap();

        let sub = section.router();
        let sub = sub.lock().await;
        assert_eq!(
            sub.url_for("settings.profile", &params(&[("tab", "security")])),
            "settings/profile/security"
        );
    });
}

#[test]
fn section_failures_surface_on_the_parent() {
    block_on(async {
        let mut router = Router::new(RouterOptions::new());
        let section = router
            .section("settings", "settings", RouterOptions::new())
            .unwrap();
        section
            .route_named(
                "settings.broken",
                "broken",
                Route::new().on_execute(|_| async {
                    HookResult::Failure(wayfinder::NavigationError::custom("inner"))
                }),
            )
            .await
            .unwrap();

        let result = router
            .navigate("settings/broken", NavigateOptions::trigger())
            .await;
        assert!(result.is_failed());
    });
}
