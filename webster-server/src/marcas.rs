//! Brand (marca) catalog endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::{validation, AppState};

/// A brand row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Marca {
    /// Brand ID.
    pub id: Uuid,
    /// Brand name.
    pub nome: String,
    /// Logo URL.
    pub logo: Option<String>,
    /// Free-form description.
    pub descricao: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Brand create/replace payload.
#[derive(Debug, Deserialize)]
pub struct MarcaPayload {
    pub nome: String,
    pub logo: Option<String>,
    pub descricao: Option<String>,
}

/// Routes under `/marcas`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

fn validate(payload: &MarcaPayload) -> ApiResult<()> {
    validation::validate_name(&payload.nome)?;
    if let Some(descricao) = &payload.descricao {
        validation::validate_description(descricao)?;
    }
    Ok(())
}

async fn find_live(state: &AppState, id: Uuid) -> ApiResult<Marca> {
    let marca: Option<Marca> =
        sqlx::query_as("SELECT * FROM marcas WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    marca.ok_or_else(|| ApiError::NotFound(format!("brand {id} not found")))
}

/// Create a brand.
#[tracing::instrument(name = "marca_create", skip(state, payload), fields(nome = %payload.nome))]
async fn create(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(payload): Json<MarcaPayload>,
) -> ApiResult<Json<Marca>> {
    validate(&payload)?;

    let marca: Marca = sqlx::query_as(
        "INSERT INTO marcas (nome, logo, descricao) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&payload.nome)
    .bind(&payload.logo)
    .bind(&payload.descricao)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(marca))
}

/// All live brands.
#[tracing::instrument(name = "marca_list", skip(state))]
async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Json<Vec<Marca>>> {
    let marcas: Vec<Marca> =
        sqlx::query_as("SELECT * FROM marcas WHERE deleted_at IS NULL ORDER BY nome")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(marcas))
}

/// Fetch one brand by ID.
#[tracing::instrument(name = "marca_get", skip(state))]
async fn get_one(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Marca>> {
    Ok(Json(find_live(&state, id).await?))
}

/// Replace a brand.
#[tracing::instrument(name = "marca_update", skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarcaPayload>,
) -> ApiResult<Json<Marca>> {
    validate(&payload)?;
    find_live(&state, id).await?;

    let marca: Marca = sqlx::query_as(
        "UPDATE marcas SET nome = $2, logo = $3, descricao = $4, updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.nome)
    .bind(&payload.logo)
    .bind(&payload.descricao)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(marca))
}

/// Soft-delete a brand.
#[tracing::instrument(name = "marca_delete", skip(state))]
async fn remove(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Marca>> {
    find_live(&state, id).await?;

    let marca: Marca =
        sqlx::query_as("UPDATE marcas SET deleted_at = now() WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(marca))
}
