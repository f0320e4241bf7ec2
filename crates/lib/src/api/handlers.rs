//! REST handlers, one per route.
//!
//! Handlers stay thin: resolve the actor, coerce the body, call the
//! service, map the result. Capability decisions all live behind the
//! service; the only validation done here is shape-of-JSON (wrong types,
//! non-array reorder payloads) that the typed service API cannot express.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::{ApiError, AppState, resolve_actor};
use crate::list::{ItemId, ListId, Permission, UserId};
use crate::service::ItemPatch;

#[derive(Deserialize)]
pub(crate) struct CreateListBody {
    name: String,
}

#[derive(Deserialize)]
pub(crate) struct RenameListBody {
    name: String,
}

#[derive(Deserialize)]
pub(crate) struct AddCollaboratorBody {
    handle: String,
    permission: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct SetPermissionBody {
    permission: String,
}

#[derive(Deserialize)]
pub(crate) struct AddItemBody {
    text: String,
}

#[derive(Deserialize)]
pub(crate) struct UpdateItemBody {
    text: Option<String>,
    completed: Option<bool>,
}

/// Coerce a reorder payload: it must be a JSON array of id strings.
fn reorder_ids(payload: &serde_json::Value) -> Result<Vec<String>, ApiError> {
    let array = payload
        .as_array()
        .ok_or_else(|| ApiError::bad_request("Reorder payload must be an array of ids"))?;
    array
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ApiError::bad_request("Reorder ids must be strings"))
        })
        .collect()
}

/// Coerce a flag-route body: absent means "toggle", a boolean field means
/// "set", anything else is malformed.
fn optional_flag(body: &[u8], field: &str) -> Result<Option<bool>, ApiError> {
    if body.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("Flag body must be JSON"))?;
    match value.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(ApiError::bad_request(format!("'{field}' must be a boolean"))),
    }
}

/// Parse an optional permission string, rejecting unknown levels.
fn parse_permission(raw: Option<&str>) -> Result<Option<Permission>, ApiError> {
    raw.map(|p| p.parse::<Permission>().map_err(crate::Error::from))
        .transpose()
        .map_err(ApiError::from)
}

/// Handler for GET /health
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Handler for POST /lists - create a list, caller becomes owner
pub(crate) async fn create_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateListBody>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let list = state.service.create_list(&actor, body.name).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// Handler for GET /lists - all lists visible to the caller
pub(crate) async fn visible_lists(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<crate::List>>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    Ok(Json(state.service.visible_lists(&actor).await?))
}

/// Handler for GET /lists/{list_id} - fetch one list, no authorization
pub(crate) async fn fetch_list(
    State(state): State<AppState>,
    Path(list_id): Path<ListId>,
) -> Result<Json<crate::List>, ApiError> {
    Ok(Json(state.service.fetch_list(&list_id).await?))
}

/// Handler for PATCH /lists/{list_id} - rename
pub(crate) async fn rename_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    Json(body): Json<RenameListBody>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    Ok(Json(
        state.service.rename_list(&actor, &list_id, body.name).await?,
    ))
}

/// Handler for DELETE /lists/{list_id}
pub(crate) async fn delete_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    state.service.delete_list(&actor, &list_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Handler for PUT /lists/reorder - reorder the caller's visible lists
pub(crate) async fn reorder_lists(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<Vec<crate::List>>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let desired = reorder_ids(&payload)?;
    Ok(Json(state.service.reorder_lists(&actor, &desired).await?))
}

/// Handler for PUT /lists/{list_id}/archive - set or toggle the flag
pub(crate) async fn set_archived(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    body: Bytes,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let desired = optional_flag(&body, "archived")?;
    Ok(Json(
        state.service.set_archived(&actor, &list_id, desired).await?,
    ))
}

/// Handler for PUT /lists/{list_id}/pin - set or toggle the flag
pub(crate) async fn set_pinned(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    body: Bytes,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let desired = optional_flag(&body, "pinned")?;
    Ok(Json(
        state.service.set_pinned(&actor, &list_id, desired).await?,
    ))
}

/// Handler for POST /lists/{list_id}/collaborators - add by external handle
pub(crate) async fn add_collaborator(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    Json(body): Json<AddCollaboratorBody>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let permission = parse_permission(body.permission.as_deref())?;
    Ok(Json(
        state
            .service
            .add_collaborator(&actor, &list_id, &body.handle, permission)
            .await?,
    ))
}

/// Handler for DELETE /lists/{list_id}/collaborators/{user_id}
pub(crate) async fn remove_collaborator(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((list_id, user_id)): Path<(ListId, UserId)>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    Ok(Json(
        state
            .service
            .remove_collaborator(&actor, &list_id, &user_id)
            .await?,
    ))
}

/// Handler for PUT /lists/{list_id}/collaborators/{user_id} - change permission
pub(crate) async fn set_collaborator_permission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((list_id, user_id)): Path<(ListId, UserId)>,
    Json(body): Json<SetPermissionBody>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let permission = parse_permission(Some(&body.permission))?
        .unwrap_or_default();
    Ok(Json(
        state
            .service
            .set_collaborator_permission(&actor, &list_id, &user_id, permission)
            .await?,
    ))
}

/// Handler for POST /lists/{list_id}/items
pub(crate) async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    Json(body): Json<AddItemBody>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let item = state.service.add_item(&actor, &list_id, body.text).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PATCH /lists/{list_id}/items/{item_id}
pub(crate) async fn update_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((list_id, item_id)): Path<(ListId, ItemId)>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<crate::list::Item>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let patch = ItemPatch {
        text: body.text,
        completed: body.completed,
    };
    Ok(Json(
        state
            .service
            .update_item(&actor, &list_id, &item_id, patch)
            .await?,
    ))
}

/// Handler for DELETE /lists/{list_id}/items/{item_id}
pub(crate) async fn delete_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((list_id, item_id)): Path<(ListId, ItemId)>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    Ok(Json(
        state.service.delete_item(&actor, &list_id, &item_id).await?,
    ))
}

/// Handler for PUT /lists/{list_id}/items/reorder
pub(crate) async fn reorder_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(list_id): Path<ListId>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<crate::List>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;
    let desired = reorder_ids(&payload)?;
    Ok(Json(
        state.service.reorder_items(&actor, &list_id, desired).await?,
    ))
}
