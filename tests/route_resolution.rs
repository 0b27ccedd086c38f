//! Route table behavior as seen by the rest of the application.

use feed_shell::routing::{
    build_route_table, Page, Resolution, RouteTable, RouteTableError, APP_ROUTES,
};

fn page_and_handle(table: &RouteTable, path: &str) -> Option<(Page, Option<String>)> {
    table
        .resolve(path)
        .matched()
        .map(|m| (m.page(), m.params.get("handle").map(str::to_string)))
}

#[test]
fn test_literal_paths_resolve_without_params() {
    let table = build_route_table().unwrap();
    let literals = [
        ("/", Page::HomeFeed),
        ("/notifications", Page::NotificationsFeed),
        ("/messages", Page::MessageGroups),
        ("/signup", Page::Signup),
        ("/signin", Page::Signin),
        ("/confirm", Page::Confirmation),
        ("/forgot", Page::Recover),
    ];

    for (path, page) in literals {
        let route = table.resolve(path).matched().unwrap();
        assert_eq!(route.page(), page, "path {path}");
        assert!(route.params.is_empty(), "path {path}");
    }
}

#[test]
fn test_user_feed_captures_handle() {
    let table = build_route_table().unwrap();
    assert_eq!(
        page_and_handle(&table, "/@alice"),
        Some((Page::UserFeed, Some("alice".into())))
    );
}

#[test]
fn test_message_thread_captures_handle() {
    let table = build_route_table().unwrap();
    assert_eq!(
        page_and_handle(&table, "/messages/@bob"),
        Some((Page::MessageGroup, Some("bob".into())))
    );
}

#[test]
fn test_unknown_paths_are_not_found() {
    let table = build_route_table().unwrap();
    for path in [
        "/unknown/path",
        "/alice",
        "/@",
        "/messages/bob",
        "/messages/@",
        "/messages/@bob/extra",
        "/Signin",
        "/NOTIFICATIONS",
    ] {
        assert!(table.resolve(path).is_not_found(), "path {path}");
    }
}

#[test]
fn test_trailing_slash_query_and_fragment_are_ignored() {
    let table = build_route_table().unwrap();
    assert_eq!(page_and_handle(&table, "/notifications/"), Some((Page::NotificationsFeed, None)));
    assert_eq!(
        page_and_handle(&table, "/@alice/?tab=replies"),
        Some((Page::UserFeed, Some("alice".into())))
    );
    assert_eq!(page_and_handle(&table, "#top"), Some((Page::HomeFeed, None)));
    assert_eq!(page_and_handle(&table, ""), Some((Page::HomeFeed, None)));
}

#[test]
fn test_build_is_idempotent() {
    let first = build_route_table().unwrap();
    let second = build_route_table().unwrap();
    assert_eq!(first, second);

    let patterns: Vec<&str> = first.entries().iter().map(|e| e.pattern.as_str()).collect();
    assert_eq!(
        patterns,
        vec![
            "/",
            "/notifications",
            "/@:handle",
            "/messages",
            "/messages/@:handle",
            "/signup",
            "/signin",
            "/confirm",
            "/forgot",
        ]
    );
}

#[test]
fn test_every_page_is_routed_once() {
    let table = build_route_table().unwrap();
    for page in Page::ALL {
        let count = table.entries().iter().filter(|e| e.page == page).count();
        assert_eq!(count, 1, "page {page}");
    }
}

#[test]
fn test_adding_a_duplicate_route_is_rejected() {
    let mut routes = APP_ROUTES.to_vec();
    routes.push(("/messages", Page::HomeFeed));
    assert_eq!(
        RouteTable::from_routes(&routes),
        Err(RouteTableError::Duplicate {
            pattern: "/messages".into(),
            existing: "/messages".into(),
        })
    );
}

#[test]
fn test_not_found_reports_normalized_path() {
    let table = build_route_table().unwrap();
    match table.resolve("/nope/?x=1") {
        Resolution::NotFound { path } => assert_eq!(path, "/nope"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
