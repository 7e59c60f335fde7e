//! Route tree construction: propagation, ordering, prefixes, names, build errors.

use axum::http::Method;
use route_builder::binding::Binder;
use route_builder::routing::NativeRouter;
use route_builder::validation::{FieldRules, ValidationSchema, ValidatorSpec};
use route_builder::{App, RouterError};

mod common;

#[test]
fn test_nested_prefixes_compose_outer_first() {
    let app = common::app();
    let mut root = App::router(&app);
    root.prefix("a");
    root.group(|b| {
        b.prefix("b");
        b.get("/c", "users@index");
    });

    let leaf = &root.groups()[0].routes()[0];
    assert_eq!(leaf.full_uri(), "a/b/c");
    assert_eq!(leaf.native_path().unwrap(), "/a/b/c");
}

#[test]
fn test_prefix_declared_after_children_still_wraps_them() {
    let app = common::app();
    let mut root = App::router(&app);
    root.group(|inner| {
        inner.prefix("/users");
        inner.get("/::user", "users@show");
    });
    root.get("/health", "users@index");
    root.prefix("/api").prefix("/v1");

    assert_eq!(root.routes()[0].full_uri(), "/v1/api/health");
    assert_eq!(root.groups()[0].routes()[0].full_uri(), "/v1/api/users/::user");
    assert_eq!(root.groups()[0].prefix_path(), "/v1/api/users");
}

#[test]
fn test_route_prefix_sits_inside_group_prefix() {
    let app = common::app();
    let mut root = App::router(&app);
    root.prefix("/api");
    root.get("/::user", "users@show").prefix("/users");

    assert_eq!(root.routes()[0].full_uri(), "/api/users/::user");
}

#[test]
fn test_middleware_between_routes_reaches_both() {
    let app = common::app();
    let mut root = App::router(&app);
    root.middleware("log");
    root.get("/first", "users@index");
    root.middleware("tag");
    root.get("/second", "users@index");

    let first = root.routes()[0].describe().unwrap();
    let second = root.routes()[1].describe().unwrap();
    let expected = vec!["bootstrap", "middleware:log", "middleware:tag", "controller:users@index"];
    assert_eq!(first, expected);
    assert_eq!(second, expected);
}

#[test]
fn test_group_and_route_attributes_follow_declaration_order() {
    let app = common::app();
    let mut root = App::router(&app);
    root.middleware("log");
    root.get("/a", "users@index").middleware("auth");
    root.middleware("tag");

    // Route-level `auth` was declared before group-level `tag`.
    assert_eq!(
        root.routes()[0].describe().unwrap(),
        vec![
            "bootstrap",
            "middleware:log",
            "middleware:auth",
            "middleware:tag",
            "controller:users@index"
        ]
    );
}

#[test]
fn test_attributes_reach_grandchildren() {
    let app = common::app();
    let mut root = App::router(&app);
    root.group(|outer| {
        outer.group(|inner| {
            inner.get("/deep/::post", "posts@show");
        });
    });
    root.middleware("auth").policy("post", "view");

    let deep = &root.groups()[0].groups()[0].routes()[0];
    assert_eq!(
        deep.describe().unwrap(),
        vec![
            "bootstrap",
            "middleware:auth",
            "binder:post",
            "policy:post@view",
            "controller:posts@show"
        ]
    );
}

#[test]
fn test_stage_kinds_run_in_fixed_order() {
    let app = common::app();
    let mut root = App::router(&app);
    root.policy("post", "update");
    root.validate("createUser");
    root.bind("author", "user");
    root.middleware("auth");
    root.put("/posts/::post", "posts@update");

    assert_eq!(
        root.routes()[0].describe().unwrap(),
        vec![
            "bootstrap",
            "middleware:auth",
            "validator:createUser",
            "binder:author->user",
            "binder:post",
            "policy:post@update",
            "controller:posts@update"
        ]
    );
}

#[test]
fn test_two_implicit_binders() {
    let app = common::app();
    let mut root = App::router(&app);
    root.get("/::user/posts/::post", "posts@show");

    let node = &root.routes()[0];
    assert_eq!(node.binders(), vec![Binder::new("user", "user"), Binder::new("post", "post")]);
    assert_eq!(node.native_path().unwrap(), "/{user}/posts/{post}");
}

#[test]
fn test_explicit_binder_overrides_implicit_for_same_field() {
    let app = common::app();
    let mut root = App::router(&app);
    root.get("/::user/articles/::post", "posts@show").bind("post", "article");

    assert_eq!(
        root.routes()[0].binders(),
        vec![Binder::new("post", "article"), Binder::new("user", "user")]
    );
}

#[test]
fn test_names_are_scoped_to_their_subtree() {
    let app = common::app();
    let mut root = App::router(&app);
    root.name("api");
    root.group(|users| {
        users.name("users");
        users.get("/users", "users@index").name("index");
    });
    root.group(|posts| {
        posts.name("posts");
        posts.get("/posts", "posts@show").name("index");
    });
    root.get("/", "users@index");

    let ancestors = vec!["api".to_string()];
    let users = &root.groups()[0];
    let posts = &root.groups()[1];
    assert_eq!(
        users.routes()[0].full_name(&[ancestors.clone(), vec!["users".into()]].concat()),
        Some("api.users.index".to_string())
    );
    assert_eq!(
        posts.routes()[0].full_name(&[ancestors, vec!["posts".into()]].concat()),
        Some("api.posts.index".to_string())
    );
    assert_eq!(root.routes()[0].full_name(&[]), None);

    let router = root.build_router(None, &[]).unwrap();
    assert_eq!(router.len(), 3);
    assert!(router.contains(&Method::GET, "/users"));
    assert!(router.contains(&Method::GET, "/posts"));
    assert!(router.contains(&Method::GET, "/"));
}

#[test]
fn test_built_names_do_not_leak_between_siblings() {
    let app = common::app();
    let mut root = App::router(&app);
    root.name("api");
    root.group(|users| {
        users.name("users");
        users.get("/users", "users@index").name("index");
    });
    root.group(|posts| {
        posts.name("posts");
        posts.get("/posts", "posts@show").name("index");
    });
    root.get("/", "users@index").name("root");
    root.get("/anonymous", "users@index");

    let router = root.build_router(None, &[]).unwrap();
    assert_eq!(router.route_name(&Method::GET, "/users"), Some("api.users.index"));
    assert_eq!(router.route_name(&Method::GET, "/posts"), Some("api.posts.index"));
    assert_eq!(router.route_name(&Method::GET, "/"), Some("api.root"));
    assert_eq!(router.route_name(&Method::GET, "/anonymous"), None);

    let outer = vec!["v1".to_string()];
    let router = root.build_router(None, &outer).unwrap();
    assert_eq!(router.route_name(&Method::GET, "/posts"), Some("v1.api.posts.index"));
    assert_eq!(outer, vec!["v1".to_string()]);
}

#[test]
fn test_build_router_extends_supplied_router() {
    let app = common::app();
    let mut first = App::router(&app);
    first.get("/one", "users@index");
    let mut second = App::router(&app);
    second.get("/two", "users@index");

    let router = first.build_router(Some(NativeRouter::new()), &[]).unwrap();
    let router = second.build_router(Some(router), &[]).unwrap();
    assert!(router.contains(&Method::GET, "/one"));
    assert!(router.contains(&Method::GET, "/two"));
}

#[test]
fn test_group_self_description() {
    let app = common::app();
    let mut root = App::router(&app);
    root.middleware("auth").validate("createUser").bind("author", "user").policy("post", "view");

    assert_eq!(root.middlewares().len(), 1);
    assert_eq!(root.validators()[0].name(), "createUser");
    assert_eq!(root.binders(), vec![&Binder::new("author", "user")]);
    assert_eq!(root.policies()[0].method, "view");
}

#[test]
fn test_unresolved_names_fail_the_build() {
    let app = common::app();

    let mut root = App::router(&app);
    root.get("/", "users@index").middleware("missing");
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::Unresolved { kind: "middlewares", .. })
    ));

    let mut root = App::router(&app);
    root.get("/", "ghosts@index");
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::Unresolved { kind: "controllers", .. })
    ));

    let mut root = App::router(&app);
    root.get("/", "users@destroy");
    assert!(matches!(root.build_router(None, &[]), Err(RouterError::UnknownAction { .. })));

    let mut root = App::router(&app);
    root.get("/", "users");
    assert!(matches!(root.build_router(None, &[]), Err(RouterError::InvalidAction(_))));

    let mut root = App::router(&app);
    root.get("/::comment", "users@index");
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::Unresolved { kind: "models", .. })
    ));
}

#[test]
fn test_policy_resolution_errors_are_configuration_errors() {
    let app = common::app();

    let mut root = App::router(&app);
    root.get("/", "users@index").policy("comment", "view");
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::Unresolved { kind: "policies", .. })
    ));

    let mut root = App::router(&app);
    root.get("/", "users@index").policy("post", "publish");
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::UnknownPolicyMethod { .. })
    ));
}

#[test]
fn test_unknown_rules_fail_the_build() {
    let app = common::app();

    let mut root = App::router(&app);
    let schema = ValidationSchema::new().field("email", FieldRules::new().rule("email", true));
    root.post("/", "users@store").validate(ValidatorSpec::new(schema));
    assert!(matches!(root.build_router(None, &[]), Err(RouterError::UnknownRule { .. })));

    let mut root = App::router(&app);
    let schema = ValidationSchema::new().field("tag", FieldRules::new().rule("exists", "tag"));
    root.post("/", "users@store").validate(ValidatorSpec::new(schema));
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::Unresolved { kind: "models", .. })
    ));
}

#[test]
fn test_duplicate_routes_fail_the_build() {
    let app = common::app();
    let mut root = App::router(&app);
    root.get("/users", "users@index");
    root.group(|g| {
        g.get("/users", "users@show");
    });
    assert!(matches!(
        root.build_router(None, &[]),
        Err(RouterError::DuplicateRoute { .. })
    ));
}
