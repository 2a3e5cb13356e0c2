//! Canvas document endpoints.
//!
//! Documents store their stage objects as a serialized JSON string; the
//! string must parse as a stage-object array (checked through
//! `webster-core`) before anything reaches the database.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::{metrics, validation, AppState};

/// Default page size for canvas listings.
const DEFAULT_TAKE: i64 = 50;
/// Maximum page size for canvas listings.
const MAX_TAKE: i64 = 100;

/// A saved canvas document row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Canvas {
    /// Canvas ID.
    pub id: Uuid,
    /// Canvas name.
    pub name: String,
    /// Canvas description.
    pub description: String,
    /// Serialized stage-object array.
    pub content: String,
    /// Background image URL.
    pub background: Option<String>,
    /// Frame width in pixels.
    pub width: i32,
    /// Frame height in pixels.
    pub height: i32,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Canvas creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateCanvas {
    pub name: String,
    pub description: String,
    pub content: String,
    pub background: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Partial canvas update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateCanvas {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub background: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Pagination query for canvas listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub take: Option<i64>,
    pub skip: Option<i64>,
}

/// Canvas listing envelope.
#[derive(Debug, Serialize)]
pub struct CanvasList {
    /// Canvases in this page, most recently updated first.
    pub canvases: Vec<Canvas>,
    /// Total number of canvases.
    pub count: i64,
}

/// Routes under `/canvas`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(get_one).patch(update).delete(remove))
}

/// Reject content that is not a stage-object array within limits.
fn validate_content(content: &str) -> ApiResult<()> {
    validation::validate_content_len(content)?;
    let objects = webster_core::parse_content(content)?;
    validation::validate_object_count(objects.len())?;
    Ok(())
}

/// Reject frame dimensions the editor cannot open.
fn validate_dimensions(width: Option<i32>, height: Option<i32>) -> ApiResult<()> {
    let min = f64::from(webster_core::frame::MIN_FRAME_SIZE);
    let max = f64::from(webster_core::frame::MAX_FRAME_SIZE);
    for edge in [width, height].into_iter().flatten() {
        if !(min..=max).contains(&f64::from(edge)) {
            return Err(ApiError::Validation(format!(
                "frame edge {edge} outside {min}..={max}"
            )));
        }
    }
    Ok(())
}

async fn find(state: &AppState, id: Uuid) -> ApiResult<Canvas> {
    let canvas: Option<Canvas> = sqlx::query_as("SELECT * FROM canvases WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    canvas.ok_or_else(|| ApiError::NotFound(format!("canvas {id} not found")))
}

/// Create a canvas document.
#[tracing::instrument(name = "canvas_create", skip(state, payload), fields(name = %payload.name))]
async fn create(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(payload): Json<CreateCanvas>,
) -> ApiResult<Json<Canvas>> {
    validation::validate_name(&payload.name)?;
    validation::validate_description(&payload.description)?;
    validate_content(&payload.content)?;
    validate_dimensions(payload.width, payload.height)?;

    let canvas: Canvas = sqlx::query_as(
        "INSERT INTO canvases (name, description, content, background, width, height) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(&payload.background)
    .bind(payload.width.unwrap_or(1080))
    .bind(payload.height.unwrap_or(1080))
    .fetch_one(&state.db)
    .await?;

    metrics::record_canvas_save("create");
    tracing::info!("Created canvas {}", canvas.id);
    Ok(Json(canvas))
}

/// A page of canvases plus the total count.
#[tracing::instrument(name = "canvas_list", skip(state))]
async fn list(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<CanvasList>> {
    let take = params.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE);
    let skip = params.skip.unwrap_or(0).max(0);

    let canvases: Vec<Canvas> =
        sqlx::query_as("SELECT * FROM canvases ORDER BY updated_at DESC LIMIT $1 OFFSET $2")
            .bind(take)
            .bind(skip)
            .fetch_all(&state.db)
            .await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM canvases")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(CanvasList { canvases, count }))
}

/// Fetch one canvas by ID.
#[tracing::instrument(name = "canvas_get", skip(state))]
async fn get_one(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Canvas>> {
    Ok(Json(find(&state, id).await?))
}

/// Partially update a canvas.
#[tracing::instrument(name = "canvas_update", skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCanvas>,
) -> ApiResult<Json<Canvas>> {
    if let Some(name) = &payload.name {
        validation::validate_name(name)?;
    }
    if let Some(description) = &payload.description {
        validation::validate_description(description)?;
    }
    if let Some(content) = &payload.content {
        validate_content(content)?;
    }
    validate_dimensions(payload.width, payload.height)?;

    find(&state, id).await?;

    let canvas: Canvas = sqlx::query_as(
        "UPDATE canvases SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             content = COALESCE($4, content), \
             background = COALESCE($5, background), \
             width = COALESCE($6, width), \
             height = COALESCE($7, height), \
             updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(&payload.background)
    .bind(payload.width)
    .bind(payload.height)
    .fetch_one(&state.db)
    .await?;

    metrics::record_canvas_save("update");
    Ok(Json(canvas))
}

/// Delete a canvas.
#[tracing::instrument(name = "canvas_delete", skip(state))]
async fn remove(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Canvas>> {
    let canvas = find(&state, id).await?;

    sqlx::query("DELETE FROM canvases WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_accepts_empty_forms() {
        assert!(validate_content("").is_ok());
        assert!(validate_content("[]").is_ok());
        assert!(validate_content("\"\"").is_ok());
    }

    #[test]
    fn test_validate_content_rejects_non_arrays() {
        assert!(validate_content("not json").is_err());
        assert!(validate_content("{\"a\": 1}").is_err());
    }

    #[test]
    fn test_validate_dimensions_bounds() {
        assert!(validate_dimensions(None, None).is_ok());
        assert!(validate_dimensions(Some(1080), Some(1920)).is_ok());
        assert!(validate_dimensions(Some(9), None).is_err());
        assert!(validate_dimensions(None, Some(10001)).is_err());
    }
}
