//! Multipart form carrying resource fields and image parts.

use std::collections::HashMap;

use axum::extract::multipart::{Field, Multipart};
use axum::extract::{FromRequest, Request};
use bytes::BytesMut;
use tracing::debug;

use carlot_core::attachment::KeepList;
use carlot_core::storage::PendingUpload;
use carlot_shared::AppError;

use crate::AppState;
use crate::error::ApiError;

/// Name of the repeated file part.
pub const IMAGES_FIELD: &str = "images";

/// Name of the comma-delimited keep-list field on updates.
pub const KEEP_IMAGES_FIELD: &str = "keepImages";

/// Parsed multipart body: text fields plus validated image parts.
///
/// Image parts must declare an `image/*` content type and stay within the
/// configured size and count limits. Violations reject the request before any
/// upload starts.
#[derive(Debug, Default)]
pub struct ResourceForm {
    fields: HashMap<String, String>,
    images: Vec<PendingUpload>,
}

impl ResourceForm {
    /// Text field by name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The keep-list field; absent means keep nothing.
    #[must_use]
    pub fn keep_list(&self) -> KeepList {
        KeepList::parse(self.text(KEEP_IMAGES_FIELD))
    }

    /// Image parts in request order.
    #[must_use]
    pub fn images(&self) -> &[PendingUpload] {
        &self.images
    }
}

impl FromRequest<AppState> for ResourceForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let limits = state.upload_limits;
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| bad_request(e.body_text()))?;

        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name != IMAGES_FIELD {
                let value = field.text().await.map_err(|e| bad_request(e.body_text()))?;
                form.fields.insert(name, value);
                continue;
            }

            // Browsers send an empty, nameless file part when nothing was picked.
            if field.file_name() == Some("") {
                continue;
            }
            if form.images.len() == limits.max_files {
                return Err(bad_request(format!(
                    "Too many images: at most {} per request",
                    limits.max_files
                )));
            }
            form.images.push(read_image(field, limits.max_file_size).await?);
        }

        debug!(
            fields = form.fields.len(),
            images = form.images.len(),
            "Parsed multipart form"
        );
        Ok(form)
    }
}

/// Reads one image part, enforcing the media type and size limit.
async fn read_image(mut field: Field<'_>, max_size: usize) -> Result<PendingUpload, ApiError> {
    let filename = field.file_name().map(String::from);
    let label = filename.clone().unwrap_or_else(|| IMAGES_FIELD.to_string());
    let media_type = field.content_type().unwrap_or_default().to_string();

    if !media_type.starts_with("image/") {
        return Err(bad_request(format!("{label} is not an image")));
    }

    let mut buf = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| bad_request(e.body_text()))?
    {
        if buf.len() + chunk.len() > max_size {
            return Err(bad_request(format!(
                "{label} exceeds {}MB limit",
                max_size / (1024 * 1024)
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    let upload = PendingUpload::new(buf.freeze(), media_type);
    Ok(match filename {
        Some(name) => upload.with_filename(name),
        None => upload,
    })
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError(AppError::Validation(vec![message.into()]))
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::extract::DefaultBodyLimit;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{Part, json_body, multipart_body, multipart_content_type, state};

    /// Echoes what the extractor produced.
    async fn echo(form: ResourceForm) -> impl IntoResponse {
        let media_types: Vec<_> = form.images().iter().map(PendingUpload::media_type).collect();
        axum::Json(json!({
            "title": form.text("title"),
            "images": form.images().len(),
            "mediaTypes": media_types,
            "keepEmpty": form.keep_list().is_empty(),
        }))
    }

    async fn send(parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
        let state = state();
        let app = Router::new()
            .route("/form", post(echo))
            .layer(DefaultBodyLimit::max(state.upload_limits.max_body_size()))
            .with_state(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/form")
                    .header(CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(parts))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_fields_and_images() {
        let (status, body) = send(&[
            ("title", None, None, b"Civic".as_slice()),
            ("images", Some("a.png"), Some("image/png"), b"png-bytes".as_slice()),
            ("images", Some("b.jpg"), Some("image/jpeg"), b"jpg-bytes".as_slice()),
            ("keepImages", None, None, b" , ".as_slice()),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Civic");
        assert_eq!(body["images"], 2);
        assert_eq!(body["mediaTypes"], json!(["image/png", "image/jpeg"]));
        assert_eq!(body["keepEmpty"], true);
    }

    #[tokio::test]
    async fn test_rejects_eleventh_image() {
        let images: Vec<Part<'_>> = (0..11)
            .map(|_| ("images", Some("x.png"), Some("image/png"), b"x".as_slice()))
            .collect();

        let (status, body) = send(&images).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "Too many images: at most 10 per request");
    }

    #[tokio::test]
    async fn test_accepts_ten_images() {
        let images: Vec<Part<'_>> = (0..10)
            .map(|_| ("images", Some("x.png"), Some("image/png"), b"x".as_slice()))
            .collect();

        let (status, body) = send(&images).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["images"], 10);
    }

    #[tokio::test]
    async fn test_rejects_non_image_part() {
        let (status, body) = send(&[("images", Some("cv.pdf"), Some("application/pdf"), b"%PDF".as_slice())]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "cv.pdf is not an image");
    }

    #[tokio::test]
    async fn test_rejects_oversized_image() {
        let big = vec![0_u8; 5 * 1024 * 1024 + 1];

        let (status, body) = send(&[("images", Some("big.png"), Some("image/png"), big.as_slice())]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "big.png exceeds 5MB limit");
    }

    #[tokio::test]
    async fn test_skips_empty_file_part() {
        let (status, body) = send(&[("images", Some(""), Some("application/octet-stream"), b"".as_slice())]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["images"], 0);
    }

    #[tokio::test]
    async fn test_rejects_non_multipart_body() {
        let app = Router::new().route("/form", post(echo)).with_state(state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/form")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
