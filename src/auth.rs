use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{AdminIdentity, AdminInfo, LoginRequest, LoginResponse},
    repository::RepositoryState,
};

/// The only role the Access Gate accepts.
pub const ADMIN_ROLE: &str = "admin";

/// Claims
///
/// Payload of every issued token. Signed with HS256 using `JWT_SECRET`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the admin's id.
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Issued At (iat), Unix seconds.
    pub iat: i64,
    /// Expiration Time (exp), Unix seconds.
    pub exp: i64,
    /// Unique token id. Nothing checks it yet; it exists so a revocation
    /// list can be keyed on it.
    pub jti: String,
}

/// issue_token
///
/// Signs a token for the given admin, valid for `config.jwt_expires_in`.
pub fn issue_token(admin: &AdminIdentity, config: &AppConfig) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(config.jwt_expires_in.as_secs())
        .ok()
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or_else(|| AppError::Internal("token lifetime out of range".to_string()))?;

    let claims = Claims {
        sub: admin.id,
        email: admin.email.clone(),
        role: ADMIN_ROLE.to_string(),
        iat: now,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
}

/// verify_token
///
/// Checks the signature and expiry (with the library's default 60s leeway)
/// and returns the embedded claims.
pub fn verify_token(token: &str, config: &AppConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

// --- Passwords ---

/// Hashes a password with bcrypt. Used by the `provision-admin` binary and tests.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

// Verified against when the email is unknown so both login failures cost one bcrypt round.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// verify_password
///
/// Runs the bcrypt comparison on the blocking pool. `None` means "no such
/// admin": a dummy hash is checked and the result is always `false`.
pub async fn verify_password(password: String, hash: Option<String>) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => bcrypt::verify(&password, &hash).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }),
        None => {
            let dummy = DUMMY_HASH.get_or_init(|| {
                bcrypt::hash("portfolio-dummy-password", bcrypt::DEFAULT_COST).unwrap_or_default()
            });
            let _ = bcrypt::verify(&password, dummy);
            false
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("password check failed: {e}")))
}

/// login
///
/// Credential verification. An unknown email and a wrong password produce the
/// same `Unauthenticated` error.
pub async fn login(
    repo: &RepositoryState,
    config: &AppConfig,
    req: LoginRequest,
) -> AppResult<LoginResponse> {
    let email = req.email.trim().to_lowercase();
    let admin = repo.find_admin_by_email(&email).await?;

    let hash = admin.as_ref().map(|a| a.password_hash.clone());
    let matches = verify_password(req.password, hash).await?;

    let admin = match admin {
        Some(admin) if matches => admin,
        _ => {
            tracing::info!(%email, "failed admin login");
            return Err(AppError::Unauthenticated);
        }
    };

    let token = issue_token(&admin, config)?;
    tracing::info!(admin_id = %admin.id, "admin logged in");

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        admin: AdminInfo {
            id: admin.id,
            email: admin.email,
        },
    })
}

// --- Access Gate ---

/// AuthAdmin
///
/// The decoded identity of a request that passed the Access Gate.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

/// AuthAdmin Extractor Implementation
///
/// Resolves the identity from the `Authorization: Bearer <token>` header alone;
/// there is no store lookup per request. Any failure (missing header, wrong
/// scheme, bad signature, expired token, non-admin role) rejects with
/// `AppError::Unauthenticated`.
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthenticated)?;

        let claims = verify_token(token, &config).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AppError::Unauthenticated
        })?;

        if claims.role != ADMIN_ROLE {
            tracing::debug!(role = %claims.role, "token rejected: role");
            return Err(AppError::Unauthenticated);
        }

        Ok(AuthAdmin {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}
