pub mod admin;
pub mod site;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use common::types::Health;
use service::SiteContext;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    match service::metrics::gather_text() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(event = "metrics_encode_failed", error = %e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Build the full application router: public site, admin API, health and metrics.
pub fn build_router(ctx: SiteContext, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/chrome", get(site::chrome))
        .route("/api/blog", get(site::blog));

    let admin_routes = Router::new()
        .route("/api/admin/services", get(admin::list_services).post(admin::create_service))
        .route("/api/admin/services/:id", put(admin::update_service).delete(admin::delete_service))
        .route("/api/admin/services/:id/form", get(admin::service_form))
        .route("/api/admin/services/:id/toggle", post(admin::toggle_service));

    public
        .merge(admin_routes)
        .with_state(ctx)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        // CORS applied last so it stays the outermost layer (as with ServiceBuilder ordering)
        .layer(cors)
}
