//! Authentication: argon2 password hashing, JWT bearer tokens, and the
//! account endpoints (`/auth/register`, `/auth/login`, `/auth/me`).

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::{header, request::Parts, HeaderMap};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::{metrics, validation, AppState};

/// A user account row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Unique display name.
    pub username: String,
    /// Argon2 hash; never serialized.
    #[serde(skip)]
    pub password_hash: String,
    /// Whether the email address was confirmed.
    pub is_email_confirmed: bool,
    /// Company owned by this user, if any.
    pub company_id: Option<Uuid>,
    /// Avatar URL.
    pub foto: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    /// Email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Plain-text password (hashed before storage).
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for the Authorization header.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// JWT claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// User email, for log correlation.
    pub email: String,
    /// Issued-at timestamp (seconds).
    pub iat: i64,
    /// Expiry timestamp (seconds).
    pub exp: i64,
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Verify a password against a stored hash.
///
/// A wrong password is `Ok(false)`; only malformed hashes error.
pub fn verify_password(hash: &str, password: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored hash unreadable: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(anyhow::anyhow!(
            "password verification failed: {e}"
        ))),
    }
}

/// Issue a signed bearer token for a user.
pub fn issue_token(config: &Config, user_id: Uuid, email: &str) -> ApiResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.jwt_expiry_hours)).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

/// Verify a bearer token and return its claims.
pub fn verify_token(config: &Config, token: &str) -> ApiResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Extract a bearer token from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth| {
            if auth.to_lowercase().starts_with("bearer ") {
                Some(auth[7..].to_string())
            } else {
                None
            }
        })
}

/// Authenticated caller, extracted from the bearer token.
///
/// Handlers take this as an argument to require authentication; requests
/// without a valid token are rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject.
    pub id: Uuid,
    /// Email from the token.
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let token = extract_bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let claims = verify_token(&app.config, &token)?;
        Ok(Self {
            id: claims.sub,
            email: claims.email,
        })
    }
}

/// Routes under `/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Create an account and sign the first token.
#[tracing::instrument(name = "auth_register", skip(state, payload), fields(email = %payload.email))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> ApiResult<Json<AuthResponse>> {
    validation::validate_email(&payload.email)?;
    validation::validate_username(&payload.username)?;
    validation::validate_password(&payload.password)?;

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&payload.email)
            .bind(&payload.username)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "email or username already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user: User = sqlx::query_as(
        "INSERT INTO users (email, username, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&payload.email)
    .bind(&payload.username)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    let token = issue_token(&state.config, user.id, &user.email)?;
    tracing::info!("Registered user {}", user.id);
    Ok(Json(AuthResponse { token, user }))
}

/// Exchange credentials for a token.
#[tracing::instrument(name = "auth_login", skip(state, payload), fields(email = %payload.email))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<Json<AuthResponse>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?;
    let Some(user) = user else {
        return Err(ApiError::Unauthorized);
    };

    if !verify_password(&user.password_hash, &payload.password)? {
        return Err(ApiError::Unauthorized);
    }

    metrics::record_login();
    let token = issue_token(&state.config, user.id, &user.email)?;
    Ok(Json(AuthResponse { token, user }))
}

/// Profile of the authenticated caller.
#[tracing::instrument(name = "auth_me", skip(state))]
async fn me(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<User>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(caller.id)
        .fetch_optional(&state.db)
        .await?;
    user.map(Json)
        .ok_or_else(|| ApiError::NotFound("user no longer exists".to_string()))
}
