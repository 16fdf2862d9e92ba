use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    envelope::Envelope,
    state::AppState,
    users::dto::{CreateUserRequest, UpdateUserRequest},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// Every outcome, failures included, goes back as 200 with the envelope as
// body; the envelope code is what callers branch on.

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Json<Envelope> {
    Json(state.users.create(&payload.name, &payload.email).await)
}

#[instrument(skip(state))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Json<Envelope> {
    Json(state.users.get(id).await)
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Json<Envelope> {
    Json(
        state
            .users
            .update(id, payload.name.as_deref(), payload.email.as_deref())
            .await,
    )
}

#[instrument(skip(state))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> Json<Envelope> {
    Json(state.users.delete(id).await)
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Envelope> {
    Json(state.users.list().await)
}
