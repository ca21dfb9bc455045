use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use post_enricher::api::http::HttpApi;
use post_enricher::api::local::LocalData;
use post_enricher::api::{AuthorSource, PostSource};
use post_enricher::enrich;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn posts() -> Json<Value> {
    Json(json!([
        {
            "id": 1,
            "authorId": 101,
            "content": "First",
            "published": 1700000000,
            "likedByMe": false,
            "likes": 2,
            "attachment": {"url": "cat.png", "description": "cat", "type": "IMAGE"},
            "authorAvatar": "ignored.jpg"
        },
        {
            "id": 2,
            "authorId": 102,
            "content": "Second",
            "published": 1700000100,
            "likedByMe": true
        }
    ]))
}

async fn author(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    match id {
        101 => Ok(Json(json!({"id": 101, "name": "Alice", "avatar": "alice.jpg"}))),
        103 => Ok(Json(json!({"id": 103, "name": "Carol", "avatar": "carol.jpg"}))),
        104 => Ok(Json(json!({"id": 104}))),
        105 => Err(StatusCode::NOT_FOUND),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn fake_api() -> Router {
    Router::new()
        .route("/api/posts", get(posts))
        .route("/api/authors/{id}", get(author))
}

#[tokio::test]
async fn test_pipeline_against_http_api() {
    let base_url = serve(fake_api()).await;
    let api = HttpApi::new(&base_url, Some(Duration::from_secs(5)));

    let enriched = enrich::run(&api, &api).await;

    assert_eq!(enriched.len(), 2);
    assert_eq!(enriched[0].author.as_ref().unwrap().name, "Alice");
    assert_eq!(enriched[0].attachment.as_ref().unwrap().url, "cat.png");
    assert!(enriched[1].author.is_none());
    assert_eq!(enriched[1].content, "Second");
    assert!(enriched.iter().all(|p| p.comments.is_none()));
}

#[tokio::test]
async fn test_author_errors_are_reported_per_kind() {
    let base_url = serve(fake_api()).await;
    let api = HttpApi::new(&format!("{}/", base_url), None);

    let not_found = api.author(105).await.unwrap_err();
    assert!(format!("{:#}", not_found).contains("404"));

    let server_error = api.author(102).await.unwrap_err();
    assert!(format!("{:#}", server_error).contains("500"));

    let malformed = api.author(104).await.unwrap_err();
    assert!(format!("{:#}", malformed).contains("malformed response"));

    assert!(enrich::fetch_author(&api, 104).await.is_none());
}

#[tokio::test]
async fn test_posts_endpoint_failure_yields_nothing() {
    let app = Router::new()
        .route("/api/posts", get(|| async { "not json" }))
        .route("/api/authors/{id}", get(author));
    let base_url = serve(app).await;
    let api = HttpApi::new(&base_url, None);

    assert!(api.posts().await.is_err());
    assert!(enrich::run(&api, &api).await.is_empty());
}

#[tokio::test]
async fn test_missing_posts_route_yields_nothing() {
    let app = Router::new().route("/api/authors/{id}", get(author));
    let base_url = serve(app).await;
    let api = HttpApi::new(&base_url, None);

    assert!(enrich::fetch_posts(&api).await.is_empty());
}

#[tokio::test]
async fn test_local_data_with_remote_authors() {
    let base_url = serve(fake_api()).await;
    let api = HttpApi::new(&base_url, None);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "posts": [
                {{"id":1,"authorId":101,"content":"a","published":0,"likedByMe":false}},
                {{"id":2,"authorId":103,"content":"b","published":0,"likedByMe":false}}
            ],
            "comments": [
                {{"id":10,"postId":1,"authorId":103,"content":"c1","published":0,"likedByMe":false}},
                {{"id":11,"postId":1,"authorId":102,"content":"c2","published":0,"likedByMe":false}},
                {{"id":12,"postId":2,"authorId":101,"content":"c3","published":0,"likedByMe":false}}
            ]
        }}"#
    )
    .unwrap();
    let local = LocalData::new(file.path());

    let enriched = enrich::run(&local, &api).await;

    assert_eq!(enriched.len(), 2);
    let first = enriched[0].comments.as_ref().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].author.as_ref().unwrap().name, "Carol");
    assert!(first[1].author.is_none());
    let second = enriched[1].comments.as_ref().unwrap();
    assert_eq!(second[0].author.as_ref().unwrap().name, "Alice");
    assert_eq!(enriched[1].author.as_ref().unwrap().name, "Carol");
}
