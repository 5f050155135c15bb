//! Integration tests against a mock content service
//!
//! Covers the build-time load, cursor following and the generate/more
//! commands over real HTTP.

use serde_json::{json, Value};
use spacetraveling::cms::{CmsError, ContentClient};
use spacetraveling::config::{ApiConfig, SiteConfig};
use spacetraveling::helpers::DateFormatter;
use spacetraveling::loader::load_home_page;
use spacetraveling::pagination::{LoadOutcome, PaginationController};
use spacetraveling::{commands, Site};
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        endpoint: format!("{}/api/v2", server.uri()),
        ..ApiConfig::default()
    }
}

fn post(uid: &str, title: &str, date: &str) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": date,
        "last_publication_date": date,
        "data": {
            "title": title,
            "subtitle": "Tudo sobre como criar a sua primeira aplicação",
            "author": "Danilo Vieira",
            "content": [{
                "heading": "Proin et varius",
                "body": [{"type": "paragraph", "text": "palavra ".repeat(198)}]
            }]
        }
    })
}

async fn mount_master_ref(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                {"id": "preview", "ref": "PREVIEW", "label": "Preview", "isMasterRef": false},
                {"id": "master", "ref": "MASTER", "label": "Master", "isMasterRef": true}
            ]
        })))
        .mount(server)
        .await;
}

/// First page (one post) pointing at a second, last page
async fn mount_two_pages(server: &MockServer) {
    mount_master_ref(server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("ref", "MASTER"))
        .and(query_param("q", r#"[[at(document.type, "posts")]]"#))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "total_pages": 2,
            "next_page": format!("{}/api/v2/documents/search?ref=MASTER&page=2", server.uri()),
            "prev_page": null,
            "results": [post("como-utilizar-hooks", "Como utilizar Hooks", "2021-03-15T19:25:28+0000")]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "next_page": null,
            "results": [post("criando-um-app-cra-do-zero", "Criando um app CRA do zero", "2021-03-25T19:27:35+0000")]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Loader
// ============================================================================

#[tokio::test]
async fn test_load_home_page() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let api = api_config(&server);
    let client = ContentClient::new(&api).unwrap();
    let page = load_home_page(&client, &api, &DateFormatter::default())
        .await
        .unwrap();

    assert_eq!(page.page, 1);
    assert!(page.next_page.as_deref().unwrap().ends_with("page=2"));
    assert_eq!(page.results.len(), 1);

    let first = &page.results[0];
    assert_eq!(first.uid, "como-utilizar-hooks");
    assert_eq!(first.title, "Como utilizar Hooks");
    assert_eq!(first.author, "Danilo Vieira");
    assert_eq!(first.display_date.as_deref(), Some("15 mar 2021"));
    assert_eq!(
        first.first_publication_date.as_deref(),
        Some("2021-03-15T19:25:28+0000")
    );
    // 3 heading words + 198 body words
    assert_eq!(first.read_time, 2);
}

#[tokio::test]
async fn test_missing_master_ref() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refs": []})))
        .mount(&server)
        .await;

    let api = api_config(&server);
    let client = ContentClient::new(&api).unwrap();
    let err = load_home_page(&client, &api, &DateFormatter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::MissingMasterRef { .. }));
}

#[tokio::test]
async fn test_access_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("access_token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [{"id": "master", "ref": "MASTER", "isMasterRef": true}]
        })))
        .mount(&server)
        .await;

    let mut api = api_config(&server);
    api.access_token = Some("secret".to_string());
    let client = ContentClient::new(&api).unwrap();
    assert_eq!(client.master_ref().await.unwrap(), "MASTER");
}

// ============================================================================
// Cursor following
// ============================================================================

#[tokio::test]
async fn test_get_page_with_relative_cursor() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = ContentClient::new(&api_config(&server)).unwrap();
    let page = client
        .get_page("/api/v2/documents/search?ref=MASTER&page=2")
        .await
        .unwrap();

    assert_eq!(page.page, Some(2));
    assert_eq!(page.next_page, None);
    assert_eq!(page.results[0].uid.as_deref(), Some("criando-um-app-cra-do-zero"));
}

#[tokio::test]
async fn test_get_page_with_endpoint_relative_cursor() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = ContentClient::new(&api_config(&server)).unwrap();
    let page = client
        .get_page("documents/search?ref=MASTER&page=2")
        .await
        .unwrap();

    assert_eq!(page.page, Some(2));
    assert_eq!(page.results[0].uid.as_deref(), Some("criando-um-app-cra-do-zero"));
}

#[tokio::test]
async fn test_controller_over_http() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let api = api_config(&server);
    let client = ContentClient::new(&api).unwrap();
    let formatter = DateFormatter::default();
    let initial = load_home_page(&client, &api, &formatter).await.unwrap();
    let mut controller = PaginationController::new(initial, formatter);

    let outcome = controller.load_next_page(&client).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Appended { count: 1, page: 2 });

    let state = controller.state();
    assert_eq!(state.page, 2);
    assert_eq!(state.next_page, None);
    let uids: Vec<_> = state.posts.iter().map(|p| p.uid.as_str()).collect();
    assert_eq!(uids, ["como-utilizar-hooks", "criando-um-app-cra-do-zero"]);
    assert_eq!(state.posts[1].display_date.as_deref(), Some("25 mar 2021"));

    let outcome = controller.load_next_page(&client).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Exhausted);
}

#[tokio::test]
async fn test_server_error_halts_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ContentClient::new(&api_config(&server)).unwrap();
    let state = serde_json::from_value(json!({
        "posts": [],
        "next_page": format!("{}/api/v2/documents/search?page=2", server.uri()),
        "page": 1
    }))
    .unwrap();
    let mut controller = PaginationController::from_state(state, DateFormatter::default());
    let before = controller.state().clone();

    let err = controller.load_next_page(&client).await.unwrap_err();
    assert!(matches!(err, CmsError::HttpStatus { status: 500, .. }));
    assert_eq!(controller.state(), &before);
    assert!(controller.failure().is_some());
    assert!(!controller.can_load_more());

    // no second request
    let outcome = controller.load_next_page(&client).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Halted);
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = ContentClient::new(&api_config(&server)).unwrap();
    let err = client.get_page("/api/v2/documents/search").await.unwrap_err();
    assert!(matches!(err, CmsError::Decode { .. }));
}

// ============================================================================
// Commands
// ============================================================================

fn site(dir: &std::path::Path, server: &MockServer) -> Site {
    let config = SiteConfig {
        api: api_config(server),
        ..SiteConfig::default()
    };
    Site::with_config(dir.to_path_buf(), config)
}

#[tokio::test]
async fn test_generate_then_more() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &server);

    commands::generate::run(&site).await.unwrap();

    let html = fs::read_to_string(site.index_path()).unwrap();
    assert!(html.contains(r#"href="/post/como-utilizar-hooks""#));
    assert!(html.contains("15 mar 2021"));
    assert!(html.contains("2 min"));
    assert!(html.contains("data-next-page="));
    assert!(!html.contains("Criando um app CRA do zero"));

    commands::more::run(&site, 1).await.unwrap();

    let html = fs::read_to_string(site.index_path()).unwrap();
    assert!(html.contains("Criando um app CRA do zero"));
    assert!(!html.contains("data-next-page="));

    let state: Value =
        serde_json::from_str(&fs::read_to_string(site.state_path()).unwrap()).unwrap();
    assert_eq!(state["page"], 2);
    assert_eq!(state["next_page"], Value::Null);
    assert_eq!(state["posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_generate_fails_without_writing() {
    let server = MockServer::start().await;
    mount_master_ref(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &server);

    assert!(commands::generate::run(&site).await.is_err());
    assert!(!site.index_path().exists());
    assert!(!site.state_path().exists());
}
