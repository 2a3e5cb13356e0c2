//! Company (empresa) endpoints.
//!
//! A user owns at most one live company. Updates and deletes are
//! restricted to the owner; deletes are soft.

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

/// A company row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Empresa {
    /// Company ID.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Tax ID (CNPJ).
    pub cnpj: String,
    /// Street address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Logo URL.
    pub logo: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Owning user.
    pub usuario_id: Uuid,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Company creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateEmpresa {
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub logo: Option<String>,
    pub description: Option<String>,
}

/// Partial company update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateEmpresa {
    pub name: Option<String>,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
}

/// Routes under `/empresas`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/minha", get(minha))
        .route("/{id}", get(get_one).patch(update).delete(remove))
}

async fn find_live(state: &AppState, id: Uuid) -> ApiResult<Empresa> {
    let empresa: Option<Empresa> =
        sqlx::query_as("SELECT * FROM empresas WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    empresa.ok_or_else(|| ApiError::NotFound(format!("company {id} not found")))
}

/// Create the caller's company.
#[tracing::instrument(name = "empresa_create", skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateEmpresa>,
) -> ApiResult<Json<Empresa>> {
    validation::validate_name(&payload.name)?;
    validation::validate_email(&payload.email)?;
    if let Some(description) = &payload.description {
        validation::validate_description(description)?;
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM empresas WHERE usuario_id = $1 AND deleted_at IS NULL")
            .bind(caller.id)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(ApiError::Forbidden(
            "user already has a registered company".to_string(),
        ));
    }

    let empresa: Empresa = sqlx::query_as(
        "INSERT INTO empresas (name, cnpj, address, phone, email, logo, description, usuario_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.cnpj)
    .bind(&payload.address)
    .bind(&payload.phone)
    .bind(&payload.email)
    .bind(&payload.logo)
    .bind(&payload.description)
    .bind(caller.id)
    .fetch_one(&state.db)
    .await?;

    // Mirror the ownership on the user row for cheap profile lookups.
    sqlx::query("UPDATE users SET company_id = $1, updated_at = now() WHERE id = $2")
        .bind(empresa.id)
        .bind(caller.id)
        .execute(&state.db)
        .await?;

    tracing::info!("User {} created company {}", caller.id, empresa.id);
    Ok(Json(empresa))
}

/// All live companies.
#[tracing::instrument(name = "empresa_list", skip(state))]
async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Json<Vec<Empresa>>> {
    let empresas: Vec<Empresa> =
        sqlx::query_as("SELECT * FROM empresas WHERE deleted_at IS NULL ORDER BY name")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(empresas))
}

/// The caller's company, or null when none exists.
#[tracing::instrument(name = "empresa_minha", skip(state))]
async fn minha(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<Option<Empresa>>> {
    let empresa: Option<Empresa> =
        sqlx::query_as("SELECT * FROM empresas WHERE usuario_id = $1 AND deleted_at IS NULL")
            .bind(caller.id)
            .fetch_optional(&state.db)
            .await?;
    Ok(Json(empresa))
}

/// Fetch one company by ID.
#[tracing::instrument(name = "empresa_get", skip(state))]
async fn get_one(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Empresa>> {
    Ok(Json(find_live(&state, id).await?))
}

/// Update the caller's company.
#[tracing::instrument(name = "empresa_update", skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmpresa>,
) -> ApiResult<Json<Empresa>> {
    if let Some(name) = &payload.name {
        validation::validate_name(name)?;
    }
    if let Some(email) = &payload.email {
        validation::validate_email(email)?;
    }
    if let Some(description) = &payload.description {
        validation::validate_description(description)?;
    }

    let empresa = find_live(&state, id).await?;
    if empresa.usuario_id != caller.id {
        return Err(ApiError::Forbidden(
            "not allowed to update this company".to_string(),
        ));
    }

    let empresa: Empresa = sqlx::query_as(
        "UPDATE empresas SET \
             name = COALESCE($2, name), \
             cnpj = COALESCE($3, cnpj), \
             address = COALESCE($4, address), \
             phone = COALESCE($5, phone), \
             email = COALESCE($6, email), \
             logo = COALESCE($7, logo), \
             description = COALESCE($8, description), \
             updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.cnpj)
    .bind(&payload.address)
    .bind(&payload.phone)
    .bind(&payload.email)
    .bind(&payload.logo)
    .bind(&payload.description)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(empresa))
}

/// Soft-delete the caller's company.
#[tracing::instrument(name = "empresa_delete", skip(state))]
async fn remove(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Empresa>> {
    let empresa = find_live(&state, id).await?;
    if empresa.usuario_id != caller.id {
        return Err(ApiError::Forbidden(
            "not allowed to remove this company".to_string(),
        ));
    }

    let empresa: Empresa =
        sqlx::query_as("UPDATE empresas SET deleted_at = now() WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&state.db)
            .await?;

    sqlx::query("UPDATE users SET company_id = NULL, updated_at = now() WHERE id = $1")
        .bind(caller.id)
        .execute(&state.db)
        .await?;

    Ok(Json(empresa))
}
