//! Handlers for image and video uploads.
//!
//! The declared content type is checked before any byte is read and the size
//! ceiling is enforced while streaming, so a rejected upload never reaches
//! the upload directory.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use recettes_core::image_variants::{encode_variants, EncodedVariant};
use recettes_core::media::{
    build_srcset, generate_filename, supports_variants, variant_filename, MediaKind, MIB,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppMultipart;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantInfo>>,
}

#[derive(Debug, Serialize)]
pub struct VariantInfo {
    pub width: u32,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub url: String,
    pub filename: String,
    /// Stored size in bytes.
    pub size: usize,
}

/// A fully read upload whose type passed the allow-list.
struct ReceivedFile {
    extension: &'static str,
    data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/images/upload
///
/// Multipart field `file`. JPEG, PNG and WebP uploads also get resized WebP
/// variants when enabled; images narrower than a variant width skip it.
pub async fn upload_image(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> AppResult<Json<ImageUploadResponse>> {
    let media = &state.config.media;
    let file = receive(&mut multipart, MediaKind::Image, media.max_image_bytes).await?;
    let filename = generate_filename(file.extension, Utc::now().timestamp_millis());

    let (data, encoded) = if media.image_variants && supports_variants(file.extension) {
        let data = file.data;
        let (data, variants) = tokio::task::spawn_blocking(move || {
            let variants = encode_variants(&data);
            (data, variants)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Image encoding task failed: {e}")))?;
        (data, variants?)
    } else {
        (file.data, Vec::new())
    };

    store(&state, &filename, &data).await?;
    let url = state.uploads.public_url(&filename);

    let mut variants = Vec::with_capacity(encoded.len());
    for EncodedVariant { width, data, .. } in &encoded {
        let name = variant_filename(&filename, *width);
        store(&state, &name, data).await?;
        variants.push(VariantInfo {
            width: *width,
            url: state.uploads.public_url(&name),
        });
    }

    tracing::info!(
        file = %filename,
        size = data.len(),
        variants = variants.len(),
        "Image uploaded"
    );

    if variants.is_empty() {
        return Ok(Json(ImageUploadResponse {
            url,
            srcset: None,
            variants: None,
        }));
    }

    let pairs: Vec<(String, u32)> = variants.iter().map(|v| (v.url.clone(), v.width)).collect();
    Ok(Json(ImageUploadResponse {
        url,
        srcset: Some(build_srcset(&pairs)),
        variants: Some(variants),
    }))
}

/// POST /api/videos/upload
///
/// Multipart field `video`; stored unchanged.
pub async fn upload_video(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> AppResult<Json<VideoUploadResponse>> {
    let max_bytes = state.config.media.max_video_bytes;
    let file = receive(&mut multipart, MediaKind::Video, max_bytes).await?;
    let filename = generate_filename(file.extension, Utc::now().timestamp_millis());

    store(&state, &filename, &file.data).await?;
    tracing::info!(file = %filename, size = file.data.len(), "Video uploaded");

    Ok(Json(VideoUploadResponse {
        url: state.uploads.public_url(&filename),
        size: file.data.len(),
        filename,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the first field named after `kind` into memory. Other fields are
/// skipped.
async fn receive(
    multipart: &mut axum::extract::Multipart,
    kind: MediaKind,
    max_bytes: usize,
) -> AppResult<ReceivedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(kind.field_name()) {
            continue;
        }
        return read_field(field, kind, max_bytes).await;
    }
    Err(AppError::validation("No file uploaded"))
}

async fn read_field(
    mut field: Field<'_>,
    kind: MediaKind,
    max_bytes: usize,
) -> AppResult<ReceivedFile> {
    let extension = field
        .content_type()
        .and_then(|ct| kind.extension_for(ct))
        .ok_or_else(|| {
            AppError::validation(format!("Invalid file type. Allowed: {}", kind.allowed_list()))
        })?;

    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if data.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(AppError::validation("No file uploaded"));
    }
    Ok(ReceivedFile { extension, data })
}

/// A body cut off by the route's body limit is reported like any other
/// oversized file.
fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::from(err)
    }
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::validation(format!("File too large (max {} MB)", max_bytes / MIB))
}

async fn store(state: &AppState, filename: &str, data: &[u8]) -> AppResult<()> {
    state
        .uploads
        .save(filename, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload {filename}: {e}")))
}
