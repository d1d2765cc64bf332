use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use slash_types::api::{
    Claims, CreateShortcutRequest, DeleteShortcutResponse, ListShortcutsResponse,
    ShortcutResponse, UpdateShortcutRequest,
};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::service::ShortcutService;

/// Runs a service call off the async runtime; the store is blocking SQLite.
async fn run_blocking<F, T>(state: AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(ShortcutService<'_>) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(ShortcutService::new(&state.db)))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
}

pub async fn list_shortcuts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let shortcuts = run_blocking(state, move |service| service.list(claims.sub)).await?;

    Ok(Json(ListShortcutsResponse { shortcuts }))
}

pub async fn get_shortcut(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let shortcut = run_blocking(state, move |service| service.get(claims.sub, &name)).await?;

    Ok(Json(ShortcutResponse { shortcut }))
}

pub async fn create_shortcut(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateShortcutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let shortcut = run_blocking(state, move |service| service.create(claims.sub, req)).await?;

    Ok((StatusCode::CREATED, Json(ShortcutResponse { shortcut })))
}

/// PATCH /shortcuts/{name}: the path names the target, `update_mask`
/// in the body lists the fields to change.
pub async fn update_shortcut(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<UpdateShortcutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let shortcut =
        run_blocking(state, move |service| service.update(claims.sub, &name, &req)).await?;

    Ok(Json(ShortcutResponse { shortcut }))
}

pub async fn delete_shortcut(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    run_blocking(state, move |service| service.delete(claims.sub, &name)).await?;

    Ok(Json(DeleteShortcutResponse::default()))
}
