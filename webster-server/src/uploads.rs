//! Multipart file uploads for logos, product images, and backgrounds.
//!
//! Files land under `{public_dir}/uploads/<category>/` with a UUID name
//! and their original (validated) extension, then serve statically from
//! `/public`. Only image extensions pass; everything else is rejected
//! before touching the disk.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::{metrics, validation, AppState};

/// Upload destination category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    MarcaLogo,
    ProdutoImagem,
    Background,
    Logo,
}

impl Category {
    /// Directory name under `uploads/`.
    fn dir(self) -> &'static str {
        match self {
            Self::MarcaLogo => "marcas",
            Self::ProdutoImagem => "produtos",
            Self::Background => "backgrounds",
            Self::Logo => "logos",
        }
    }

    /// Label used in metrics and logs.
    fn label(self) -> &'static str {
        match self {
            Self::MarcaLogo => "marca-logo",
            Self::ProdutoImagem => "produto-imagem",
            Self::Background => "background",
            Self::Logo => "logo",
        }
    }
}

/// Response for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable status.
    pub message: String,
    /// Public URL of the stored file.
    pub url: String,
    /// Stored filename.
    pub filename: String,
    /// Name the client sent.
    pub original_filename: String,
    /// Content type the client sent.
    pub mimetype: String,
    /// Stored size in bytes.
    pub size: usize,
}

/// Routes under `/upload`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/marca-logo", post(upload_marca_logo))
        .route("/produto-imagem", post(upload_produto_imagem))
        .route("/background", post(upload_background))
        .route("/logo", post(upload_logo))
        .route("/background/{filename}", delete(delete_background))
}

async fn upload_marca_logo(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    store_upload(&state, &caller, Category::MarcaLogo, multipart).await
}

async fn upload_produto_imagem(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    store_upload(&state, &caller, Category::ProdutoImagem, multipart).await
}

async fn upload_background(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    store_upload(&state, &caller, Category::Background, multipart).await
}

async fn upload_logo(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    store_upload(&state, &caller, Category::Logo, multipart).await
}

/// Read the `file` field, validate it, and write it to disk.
#[tracing::instrument(name = "upload", skip(state, caller, multipart), fields(category = category.label(), user = %caller.id))]
async fn store_upload(
    state: &AppState,
    caller: &AuthUser,
    category: Category,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let original_filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let mimetype = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let ext = validation::extension_of(&original_filename)
            .ok_or_else(|| ApiError::Validation("file has no extension".to_string()))?;
        validation::validate_extension(&ext)?;

        let data = field.bytes().await?;
        if data.len() > state.config.max_upload_bytes {
            return Err(ApiError::PayloadTooLarge);
        }
        if data.is_empty() {
            return Err(ApiError::Validation("file is empty".to_string()));
        }

        let filename = format!("{}.{ext}", Uuid::new_v4());
        let dir = state.config.public_dir.join("uploads").join(category.dir());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), &data).await?;

        let url = format!("/public/uploads/{}/{filename}", category.dir());
        metrics::record_upload(category.label());
        tracing::info!("Stored {} ({} bytes) at {url}", original_filename, data.len());

        return Ok(Json(UploadResponse {
            message: "Upload successful".to_string(),
            url,
            filename,
            original_filename,
            mimetype,
            size: data.len(),
        }));
    }

    Err(ApiError::Validation("missing 'file' field".to_string()))
}

/// Remove a previously uploaded background image.
#[tracing::instrument(name = "upload_delete_background", skip(state))]
async fn delete_background(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(filename): Path<String>,
) -> ApiResult<StatusCode> {
    validation::validate_stored_filename(&filename)?;

    let path = state
        .config
        .public_dir
        .join("uploads")
        .join(Category::Background.dir())
        .join(&filename);

    if !tokio::fs::try_exists(&path).await? {
        return Err(ApiError::NotFound(format!("file {filename} not found")));
    }

    tokio::fs::remove_file(&path).await?;
    tracing::info!("Removed background {filename}");
    Ok(StatusCode::NO_CONTENT)
}
