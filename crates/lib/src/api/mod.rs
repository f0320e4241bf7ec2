//! The externally visible surface: REST routes plus the relay websocket.
//!
//! JSON over HTTP, resource-scoped by list id. Actors are resolved from an
//! `Authorization: Bearer` header through the external identity directory;
//! an absent header is an anonymous (read-only) caller, a present but
//! unverifiable one is rejected outright. The websocket endpoint carries
//! the relay's room protocol and performs no authorization of its own.

pub mod error;
mod handlers;
mod ws;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post, put};

pub use error::ApiError;

use crate::access::Actor;
use crate::identity::Directory;
use crate::relay::Relay;
use crate::service::ListService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ListService>,
    pub directory: Arc<dyn Directory>,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(
        service: Arc<ListService>,
        directory: Arc<dyn Directory>,
        relay: Arc<Relay>,
    ) -> Self {
        Self {
            service,
            directory,
            relay,
        }
    }
}

/// Build the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/lists",
            post(handlers::create_list).get(handlers::visible_lists),
        )
        .route("/lists/reorder", put(handlers::reorder_lists))
        .route(
            "/lists/{list_id}",
            get(handlers::fetch_list)
                .patch(handlers::rename_list)
                .delete(handlers::delete_list),
        )
        .route("/lists/{list_id}/archive", put(handlers::set_archived))
        .route("/lists/{list_id}/pin", put(handlers::set_pinned))
        .route(
            "/lists/{list_id}/collaborators",
            post(handlers::add_collaborator),
        )
        .route(
            "/lists/{list_id}/collaborators/{user_id}",
            put(handlers::set_collaborator_permission).delete(handlers::remove_collaborator),
        )
        .route("/lists/{list_id}/items", post(handlers::add_item))
        .route("/lists/{list_id}/items/reorder", put(handlers::reorder_items))
        .route(
            "/lists/{list_id}/items/{item_id}",
            axum::routing::patch(handlers::update_item).delete(handlers::delete_item),
        )
        .route("/ws", get(ws::upgrade))
        .with_state(state)
}

/// Resolve the acting user from the request headers.
///
/// No header means an anonymous caller; reads still work. A header that is
/// malformed or names a credential the directory does not recognize is a
/// hard 401, never a silent downgrade to anonymous.
pub(crate) async fn resolve_actor(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Actor, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(Actor::Anonymous);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(ApiError::unauthorized)?;

    match state.directory.verify_token(token).await? {
        Some(user) => Ok(Actor::User(user)),
        None => Err(ApiError::unauthorized()),
    }
}
