use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::Service;
use serde::{Deserialize, Serialize};
use service::admin::service_table::ServiceRow;
use service::admin::{ServiceForm, ServiceFormInput, ServiceFormView, ServiceTable, ServiceTableView};
use service::notify::{Notification, RecordingNotifier};
use service::pagination::ServiceFilters;
use service::query_cache::QueryKey;
use service::SiteContext;
use tracing::info;

use crate::errors::ApiError;

/// Result of a mutation plus the toasts it raised.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T> {
    pub data: T,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub async fn list_services(
    State(ctx): State<SiteContext>,
    Query(filters): Query<ServiceFilters>,
) -> Result<Json<ServiceTableView>, ApiError> {
    let view = ServiceTable::new(filters).load(&ctx).await?;
    Ok(Json(view))
}

/// Edit form bound to an existing service, features included.
pub async fn service_form(
    State(ctx): State<SiteContext>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceFormView>, ApiError> {
    let form = ServiceForm::open_existing(&ctx, id).await?;
    Ok(Json(form.view()))
}

pub async fn create_service(
    State(ctx): State<SiteContext>,
    Json(input): Json<ServiceFormInput>,
) -> Result<(StatusCode, Json<MutationResponse<Service>>), ApiError> {
    let mut form = ServiceForm::new();
    form.apply(input);
    let saved = submit(&ctx, &mut form).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_service(
    State(ctx): State<SiteContext>,
    Path(id): Path<i64>,
    Json(input): Json<ServiceFormInput>,
) -> Result<Json<MutationResponse<Service>>, ApiError> {
    let mut form = ServiceForm::open_existing(&ctx, id).await?;
    form.apply(input);
    Ok(Json(submit(&ctx, &mut form).await?))
}

async fn submit(ctx: &SiteContext, form: &mut ServiceForm) -> Result<MutationResponse<Service>, ApiError> {
    let notifier = RecordingNotifier::new();
    match form.submit(ctx, &notifier, |saved| info!(event = "form_submitted", id = saved.id)).await {
        Ok(data) => Ok(MutationResponse { data, notifications: notifier.take() }),
        Err(e) => Err(ApiError::from(e).with_notifications(notifier.take())),
    }
}

async fn load_row(ctx: &SiteContext, id: i64) -> Result<ServiceRow, ApiError> {
    let api = ctx.services.clone();
    let service = ctx
        .cache
        .get_or_fetch(QueryKey::Service(id), || async move { api.get_service(id).await })
        .await?;
    Ok(ServiceRow::new(&service, &ctx.site.base_url))
}

pub async fn toggle_service(
    State(ctx): State<SiteContext>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse<Service>>, ApiError> {
    // 以后端当前状态为准，不用缓存
    let current = ctx.services.get_service(id).await?;
    let row = ServiceRow::new(&current, &ctx.site.base_url);
    let notifier = RecordingNotifier::new();
    match ServiceTable::toggle_status(&ctx, &row, &notifier).await {
        Ok(data) => Ok(Json(MutationResponse { data, notifications: notifier.take() })),
        Err(e) => Err(ApiError::from(e).with_notifications(notifier.take())),
    }
}

/// Requires `?confirm=true`; without it the backend is never called.
pub async fn delete_service(
    State(ctx): State<SiteContext>,
    Path(id): Path<i64>,
    Query(q): Query<DeleteQuery>,
) -> Result<Json<MutationResponse<i64>>, ApiError> {
    let row = load_row(&ctx, id).await?;
    let notifier = RecordingNotifier::new();
    let confirmed = |_: &str| q.confirm;
    match ServiceTable::delete(&ctx, &row, &confirmed, &notifier).await {
        Ok(()) => Ok(Json(MutationResponse { data: id, notifications: notifier.take() })),
        Err(e) => Err(ApiError::from(e).with_notifications(notifier.take())),
    }
}
