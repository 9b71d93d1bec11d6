use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use configs::BackendConfig;
use models::{ServiceUpdate, StatusFilter};
use serde_json::{json, Value};
use service::api::http::HttpApiClient;
use service::api::{BlogApi, BlogFilters, ServicesApi};
use service::pagination::ServiceFilters;
use service::ServiceError;
use tokio::net::TcpListener;

/// Last request seen by the stub backend.
#[derive(Clone, Default)]
struct Seen {
    query: Arc<Mutex<Vec<(String, String)>>>,
    body: Arc<Mutex<Option<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn list_services(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(q): Query<Vec<(String, String)>>,
) -> Json<Value> {
    *seen.query.lock().unwrap() = q;
    *seen.auth.lock().unwrap() = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "data": [{"id": "1", "title": "Web", "slug": "web", "icon": "code", "is_active": 1, "features_count": 2}],
        "pagination": {"page": 1, "limit": 10, "total": 1, "total_pages": 1}
    }))
}

async fn get_service(Path(id): Path<i64>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match id {
        1 => Ok(Json(json!({"data": {"id": 1, "title": "Web", "slug": "web", "features": [
            {"id": 5, "title": "Fast", "display_order": 0}
        ]}}))),
        2 => Ok(Json(json!({"id": 2, "title": "Bare", "slug": "bare"}))),
        _ => Err((StatusCode::NOT_FOUND, Json(json!({"message": "Service not found"})))),
    }
}

async fn update_service(
    State(seen): State<Seen>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    *seen.body.lock().unwrap() = Some(body.clone());
    if id == 9 {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error": "Slug already exists"}))));
    }
    Ok(Json(json!({"data": {"id": id, "title": "Web", "slug": "web", "is_active": body["is_active"]}})))
}

async fn delete_service(Path(id): Path<i64>) -> StatusCode {
    if id == 1 { StatusCode::NO_CONTENT } else { StatusCode::INTERNAL_SERVER_ERROR }
}

async fn list_posts(State(seen): State<Seen>, Query(q): Query<Vec<(String, String)>>) -> Json<Value> {
    *seen.query.lock().unwrap() = q;
    Json(json!({
        "data": [
            {"id": 1, "title": "Hello", "tags": "[\"rust\",\"web\"]", "view_count": "75", "created_at": "2024-05-01 10:00:00"},
            {"id": 2, "title": "Second", "tags": "news, updates"}
        ],
        "meta": {"category_counts": {"news": 1}}
    }))
}

async fn start_backend() -> anyhow::Result<(String, Seen)> {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/services", get(list_services))
        .route("/api/services/:id", get(get_service).put(update_service).delete(delete_service))
        .route("/api/blog", get(list_posts))
        .with_state(seen.clone());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("stub backend error: {}", e); }
    });
    Ok((format!("http://{}:{}/api", addr.ip(), addr.port()), seen))
}

fn client(base_url: &str, token: Option<&str>) -> HttpApiClient {
    let cfg = BackendConfig { base_url: format!("{base_url}/"), timeout_secs: 5, auth_token: token.map(str::to_string) };
    HttpApiClient::new(&cfg).expect("client")
}

#[tokio::test]
async fn list_sends_filters_and_bearer_token() -> anyhow::Result<()> {
    let (base, seen) = start_backend().await?;
    let api = client(&base, Some("secret"));
    let filters = ServiceFilters::default().with_search("web").with_status(StatusFilter::Active);
    let page = api.list_services(&filters).await?;

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, 1);
    assert!(page.data[0].is_active);
    assert_eq!(page.data[0].feature_count(), 2);
    assert_eq!(page.pagination.pages, 1);

    let query = seen.query.lock().unwrap().clone();
    assert!(query.contains(&("search".to_string(), "web".to_string())));
    assert!(query.contains(&("status".to_string(), "active".to_string())));
    assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer secret"));
    Ok(())
}

#[tokio::test]
async fn single_record_accepts_wrapped_and_bare_bodies() -> anyhow::Result<()> {
    let (base, _) = start_backend().await?;
    let api = client(&base, None);
    let wrapped = api.get_service(1).await?;
    assert_eq!(wrapped.features[0].id, Some(5));
    let bare = api.get_service(2).await?;
    assert_eq!(bare.title, "Bare");
    Ok(())
}

#[tokio::test]
async fn not_found_carries_backend_message() -> anyhow::Result<()> {
    let (base, _) = start_backend().await?;
    let err = client(&base, None).get_service(404).await.unwrap_err();
    match err {
        ServiceError::NotFound(msg) => assert_eq!(msg, "Service not found"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn status_toggle_sends_only_the_flag() -> anyhow::Result<()> {
    let (base, seen) = start_backend().await?;
    let api = client(&base, None);
    let saved = api.update_service(3, &ServiceUpdate::Status { is_active: false }).await?;
    assert!(!saved.is_active);
    assert_eq!(seen.body.lock().unwrap().clone(), Some(json!({"is_active": false})));
    Ok(())
}

#[tokio::test]
async fn error_field_is_used_when_message_is_absent() -> anyhow::Result<()> {
    let (base, _) = start_backend().await?;
    let err = client(&base, None).update_service(9, &ServiceUpdate::Status { is_active: true }).await.unwrap_err();
    assert!(matches!(&err, ServiceError::Api { status: 422, .. }));
    assert_eq!(err.user_message("Failed to save service"), "Slug already exists");
    Ok(())
}

#[tokio::test]
async fn delete_failure_without_body_uses_fallback_text() -> anyhow::Result<()> {
    let (base, _) = start_backend().await?;
    let api = client(&base, None);
    api.delete_service(1).await?;
    let err = api.delete_service(2).await.unwrap_err();
    match &err {
        ServiceError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message("Failed to delete service"), "Failed to delete service");
    Ok(())
}

#[tokio::test]
async fn blog_feed_normalises_tags_and_counts() -> anyhow::Result<()> {
    let (base, seen) = start_backend().await?;
    let feed = client(&base, None).list_posts(&BlogFilters::published()).await?;
    assert_eq!(&*feed.posts[0].tags, &["rust".to_string(), "web".to_string()]);
    assert_eq!(&*feed.posts[1].tags, &["news".to_string(), "updates".to_string()]);
    assert_eq!(feed.posts[0].view_count, 75);
    assert!(feed.posts[0].created_at.is_some());
    assert_eq!(feed.category_counts[0].count, 1);
    assert_eq!(seen.query.lock().unwrap().clone(), vec![("status".to_string(), "published".to_string())]);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    let err = client(&format!("http://{addr}"), None).get_service(1).await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
    Ok(())
}
