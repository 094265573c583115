//! Authentication routes for signup and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use carlot_core::auth::{check_credentials, hash_password, verify_password};
use carlot_db::AccountRepository;
use carlot_shared::auth::{Credentials, LoginResponse, SignupResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

/// POST /auth/signup - Create an account and return a token.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> impl IntoResponse {
    let username = match check_credentials(&payload.username, &payload.password) {
        Ok(username) => username,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "VALIDATION_ERROR",
                    "message": "Validation failed",
                    "errors": errors
                })),
            )
                .into_response();
        }
    };

    let repo = AccountRepository::new((*state.db).clone());

    match repo.username_exists(&username).await {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "username_taken",
                    "message": "Username already exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during signup");
            return internal_error("Server error");
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("Server error");
        }
    };

    let account = match repo.create(&username, &password_hash).await {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to create account");
            return internal_error("Server error");
        }
    };

    let token = match state.jwt_service.issue_token(account.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to issue token");
            return internal_error("Server error");
        }
    };

    info!(account_id = %account.id, "Account created");

    (
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created",
            token,
        }),
    )
        .into_response()
}

/// POST /auth/login - Verify credentials and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> impl IntoResponse {
    let invalid_credentials = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "invalid_credentials",
                "message": "Invalid credentials"
            })),
        )
            .into_response()
    };

    let repo = AccountRepository::new((*state.db).clone());

    let account = match repo.find_by_username(payload.username.trim()).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown account");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(account_id = %account.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    match state.jwt_service.issue_token(account.id) {
        Ok(token) => {
            info!(account_id = %account.id, "Account logged in");
            (StatusCode::OK, Json(LoginResponse { token })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to issue token");
            internal_error("An error occurred during login")
        }
    }
}
