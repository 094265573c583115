//! User (people) routes. These records are not tied to an account and need
//! no authentication.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use uuid::Uuid;

use carlot_core::resource::{NewPerson, PersonPatch};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ResourceForm;

/// Creates the users router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// POST /users - Create a user with its images.
async fn create_user(
    State(state): State<AppState>,
    form: ResourceForm,
) -> Result<impl IntoResponse, ApiError> {
    let draft = NewPerson::from_fields(form.text("name"), form.text("phone"), form.text("email"));
    let person = state.people().create(None, draft, form.images()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": person,
            "message": "User created successfully"
        })),
    ))
}

/// GET /users - List all users.
async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let people = state.people().list(None).await?;
    Ok(Json(people))
}

/// GET /users/{id} - Get a user.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let person = state.people().get(id, None).await?;
    Ok(Json(json!({ "success": true, "data": person })))
}

/// PUT /users/{id} - Update supplied fields and reconcile images.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    form: ResourceForm,
) -> Result<impl IntoResponse, ApiError> {
    let patch = PersonPatch::from_fields(form.text("name"), form.text("phone"), form.text("email"));
    let person = state
        .people()
        .update(id, None, patch, &form.keep_list(), form.images())
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": person,
        "message": "User updated successfully"
    })))
}

/// DELETE /users/{id} - Delete a user and its images.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.people().delete(id, None).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User and associated images deleted successfully"
    })))
}
