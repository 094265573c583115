//! Car routes. Every route requires authentication and is scoped to the caller.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use uuid::Uuid;

use carlot_core::resource::{CarPatch, NewCar};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ResourceForm;
use crate::middleware::auth::AuthUser;

/// Creates the car router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/{id}",
            get(get_car).put(update_car).delete(delete_car),
        )
}

/// POST /cars - Create a car with its images.
async fn create_car(
    State(state): State<AppState>,
    auth: AuthUser,
    form: ResourceForm,
) -> Result<impl IntoResponse, ApiError> {
    let draft = NewCar::from_fields(form.text("title"), form.text("description"), form.text("tags"));
    let car = state
        .cars()
        .create(Some(auth.account_id()), draft, form.images())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": car,
            "message": "Car created successfully"
        })),
    ))
}

/// GET /cars - List the caller's cars.
async fn list_cars(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let cars = state.cars().list(Some(auth.account_id())).await?;
    Ok(Json(cars))
}

/// GET /cars/{id} - Get one of the caller's cars.
async fn get_car(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let car = state.cars().get(id, Some(auth.account_id())).await?;
    Ok(Json(car))
}

/// PUT /cars/{id} - Update fields and reconcile images against `keepImages`.
async fn update_car(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    form: ResourceForm,
) -> Result<impl IntoResponse, ApiError> {
    let patch = CarPatch::from_fields(form.text("title"), form.text("description"), form.text("tags"));
    let car = state
        .cars()
        .update(id, Some(auth.account_id()), patch, &form.keep_list(), form.images())
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": car,
        "message": "Car updated successfully"
    })))
}

/// DELETE /cars/{id} - Delete a car and its images.
async fn delete_car(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.cars().delete(id, Some(auth.account_id())).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Car and associated images deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header::AUTHORIZATION, header::CONTENT_TYPE};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{Part, app, json_body, multipart_body, multipart_content_type, token};

    #[tokio::test]
    async fn test_create_requires_token() {
        let (app, _) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cars")
                    .header(CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&[("title", None, None, b"Civic".as_slice())]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (app, state) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cars")
                    .header(AUTHORIZATION, format!("Bearer {}", token(&state)))
                    .header(CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&[("tags", None, None, b"suv".as_slice())]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["errors"],
            json!(["Description is required", "Title is required"])
        );
    }

    #[tokio::test]
    async fn test_create_rejects_eleven_images() {
        let (app, state) = app();
        let mut parts: Vec<Part<'_>> = vec![
            ("title", None, None, b"Civic".as_slice()),
            ("description", None, None, b"One owner".as_slice()),
        ];
        parts.extend((0..11).map(|_| ("images", Some("x.png"), Some("image/png"), b"x".as_slice())));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cars")
                    .header(AUTHORIZATION, format!("Bearer {}", token(&state)))
                    .header(CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&parts))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let (app, state) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/cars/not-a-uuid")
                    .header(AUTHORIZATION, format!("Bearer {}", token(&state)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
