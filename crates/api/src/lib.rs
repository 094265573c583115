//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for auth, cars and users
//! - Authentication middleware
//! - The multipart form extractor feeding image uploads
//! - JSON error rendering

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use carlot_core::resource::ResourceService;
use carlot_core::storage::StorageService;
use carlot_db::{CarRepository, PersonRepository};
use carlot_shared::JwtService;
use carlot_shared::config::UploadLimits;

/// Car service bound to the production repository and store.
pub type CarService = ResourceService<CarRepository, StorageService>;

/// People service bound to the production repository and store.
pub type PersonService = ResourceService<PersonRepository, StorageService>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Blob store for resource images.
    pub storage: Arc<StorageService>,
    /// Limits on inbound image parts.
    pub upload_limits: UploadLimits,
}

impl AppState {
    /// Car service for one request.
    #[must_use]
    pub fn cars(&self) -> CarService {
        ResourceService::new(
            Arc::new(CarRepository::new((*self.db).clone())),
            Arc::clone(&self.storage),
        )
    }

    /// People service for one request.
    #[must_use]
    pub fn people(&self) -> PersonService {
        ResourceService::new(
            Arc::new(PersonRepository::new((*self.db).clone())),
            Arc::clone(&self.storage),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(state.upload_limits.max_body_size()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
