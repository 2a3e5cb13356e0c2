//! Product (produto) catalog endpoints.
//!
//! Products without an explicit brand attach to the shared "Padrão" brand,
//! which is created on first use. Responses embed a brand summary so the
//! editor toolbar can render catalog entries in one round trip.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::{validation, AppState};

/// Name of the fallback brand for uncategorized products.
const DEFAULT_MARCA_NOME: &str = "Padrão";

/// A product row joined with its brand summary.
#[derive(Debug, Clone, FromRow)]
struct ProdutoRow {
    id: Uuid,
    nome: String,
    foto1: Option<String>,
    foto2: Option<String>,
    foto3: Option<String>,
    descricao: Option<String>,
    preco: Decimal,
    categoria: Option<String>,
    marca_id: Option<Uuid>,
    barcode: Option<String>,
    codsys: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    marca_nome: Option<String>,
    marca_logo: Option<String>,
}

/// Brand summary embedded in product responses.
#[derive(Debug, Clone, Serialize)]
pub struct MarcaSummary {
    /// Brand ID.
    pub id: Uuid,
    /// Brand name.
    pub nome: String,
    /// Logo URL.
    pub logo: Option<String>,
}

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Produto {
    pub id: Uuid,
    pub nome: String,
    pub foto1: Option<String>,
    pub foto2: Option<String>,
    pub foto3: Option<String>,
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub categoria: Option<String>,
    pub marca_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub codsys: Option<String>,
    pub marca: Option<MarcaSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ProdutoRow> for Produto {
    fn from(row: ProdutoRow) -> Self {
        let marca = match (row.marca_id, row.marca_nome) {
            (Some(id), Some(nome)) => Some(MarcaSummary {
                id,
                nome,
                logo: row.marca_logo,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            nome: row.nome,
            foto1: row.foto1,
            foto2: row.foto2,
            foto3: row.foto3,
            descricao: row.descricao,
            preco: row.preco,
            categoria: row.categoria,
            marca_id: row.marca_id,
            barcode: row.barcode,
            codsys: row.codsys,
            marca,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Product creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateProduto {
    pub nome: String,
    pub foto1: Option<String>,
    pub foto2: Option<String>,
    pub foto3: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    pub categoria: Option<String>,
    pub marca_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub codsys: Option<String>,
}

/// Partial product update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProduto {
    pub nome: Option<String>,
    pub foto1: Option<String>,
    pub foto2: Option<String>,
    pub foto3: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    pub categoria: Option<String>,
    pub marca_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub codsys: Option<String>,
}

/// Routes under `/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(get_one).patch(update).delete(remove))
}

const SELECT_JOINED: &str = "SELECT p.*, m.nome AS marca_nome, m.logo AS marca_logo \
     FROM produtos p LEFT JOIN marcas m ON m.id = p.marca_id";

async fn find_live(state: &AppState, id: Uuid) -> ApiResult<ProdutoRow> {
    let row: Option<ProdutoRow> =
        sqlx::query_as(&format!("{SELECT_JOINED} WHERE p.id = $1 AND p.deleted_at IS NULL"))
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    row.ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))
}

/// The shared fallback brand, created on first use.
async fn default_marca_id(state: &AppState) -> ApiResult<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM marcas WHERE nome = $1 AND deleted_at IS NULL")
            .bind(DEFAULT_MARCA_NOME)
            .fetch_optional(&state.db)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) =
        sqlx::query_as("INSERT INTO marcas (nome, descricao) VALUES ($1, $2) RETURNING id")
            .bind(DEFAULT_MARCA_NOME)
            .bind("Marca padrão para produtos")
            .fetch_one(&state.db)
            .await?;
    tracing::info!("Created default brand {id}");
    Ok(id)
}

/// Create a product.
#[tracing::instrument(name = "produto_create", skip(state, payload), fields(nome = %payload.nome))]
async fn create(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(payload): Json<CreateProduto>,
) -> ApiResult<Json<Produto>> {
    validation::validate_name(&payload.nome)?;
    if let Some(descricao) = &payload.descricao {
        validation::validate_description(descricao)?;
    }

    let marca_id = match payload.marca_id {
        Some(id) => id,
        None => default_marca_id(&state).await?,
    };

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO produtos \
             (nome, foto1, foto2, foto3, descricao, preco, categoria, marca_id, barcode, codsys) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind(&payload.nome)
    .bind(&payload.foto1)
    .bind(&payload.foto2)
    .bind(&payload.foto3)
    .bind(&payload.descricao)
    .bind(payload.preco.unwrap_or_default())
    .bind(&payload.categoria)
    .bind(marca_id)
    .bind(&payload.barcode)
    .bind(&payload.codsys)
    .fetch_one(&state.db)
    .await?;

    let row = find_live(&state, id).await?;
    Ok(Json(row.into()))
}

/// All live products, newest first.
#[tracing::instrument(name = "produto_list", skip(state))]
async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Json<Vec<Produto>>> {
    let rows: Vec<ProdutoRow> = sqlx::query_as(&format!(
        "{SELECT_JOINED} WHERE p.deleted_at IS NULL ORDER BY p.created_at DESC"
    ))
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows.into_iter().map(Produto::from).collect()))
}

/// Fetch one product by ID.
#[tracing::instrument(name = "produto_get", skip(state))]
async fn get_one(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Produto>> {
    let row = find_live(&state, id).await?;
    Ok(Json(row.into()))
}

/// Partially update a product.
#[tracing::instrument(name = "produto_update", skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduto>,
) -> ApiResult<Json<Produto>> {
    if let Some(nome) = &payload.nome {
        validation::validate_name(nome)?;
    }
    if let Some(descricao) = &payload.descricao {
        validation::validate_description(descricao)?;
    }
    find_live(&state, id).await?;

    sqlx::query(
        "UPDATE produtos SET \
             nome = COALESCE($2, nome), \
             foto1 = COALESCE($3, foto1), \
             foto2 = COALESCE($4, foto2), \
             foto3 = COALESCE($5, foto3), \
             descricao = COALESCE($6, descricao), \
             preco = COALESCE($7, preco), \
             categoria = COALESCE($8, categoria), \
             marca_id = COALESCE($9, marca_id), \
             barcode = COALESCE($10, barcode), \
             codsys = COALESCE($11, codsys), \
             updated_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&payload.nome)
    .bind(&payload.foto1)
    .bind(&payload.foto2)
    .bind(&payload.foto3)
    .bind(&payload.descricao)
    .bind(payload.preco)
    .bind(&payload.categoria)
    .bind(payload.marca_id)
    .bind(&payload.barcode)
    .bind(&payload.codsys)
    .execute(&state.db)
    .await?;

    let row = find_live(&state, id).await?;
    Ok(Json(row.into()))
}

/// Soft-delete a product.
#[tracing::instrument(name = "produto_delete", skip(state))]
async fn remove(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Produto>> {
    find_live(&state, id).await?;

    sqlx::query("UPDATE produtos SET deleted_at = now() WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    // Return the row as it was deleted, marker included.
    let row: Option<ProdutoRow> = sqlx::query_as(&format!("{SELECT_JOINED} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    row.map(|r| Json(r.into()))
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))
}
