use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use slash_db::Database;
use slash_db::models::{FindUser, NewUser};
use slash_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};

use crate::convert::convert_role;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 30;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    // Validate input
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(ApiError::InvalidArgument("invalid email".into()));
    }
    if req.nickname.is_empty() {
        return Err(ApiError::InvalidArgument("nickname is required".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::InvalidArgument(
            "password must be at least 8 characters".into(),
        ));
    }

    // Check if email is taken
    if state
        .db
        .get_user(&FindUser {
            email: Some(req.email.clone()),
            ..Default::default()
        })
        .map_err(|e| ApiError::from_store("failed to look up user", e))?
        .is_some()
    {
        return Err(ApiError::AlreadyExists("email already registered".into()));
    }

    let password_hash = hash_password(&req.password)?;

    let user = state
        .db
        .create_user(&NewUser {
            email: req.email,
            nickname: req.nickname,
            password_hash,
        })
        .map_err(|e| ApiError::from_store("failed to create user", e))?;

    let token = create_token(&state.jwt_secret, user.id, &user.email)?;

    info!("Registered user {} as {}", user.id, user.role);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            role: convert_role(user.role),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let user = state
        .db
        .get_user(&FindUser {
            email: Some(req.email),
            ..Default::default()
        })
        .map_err(|e| ApiError::from_store("failed to look up user", e))?
        .ok_or(ApiError::Unauthenticated)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is invalid: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthenticated)?;

    let token = create_token(&state.jwt_secret, user.id, &user.email)?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        role: convert_role(user.role),
        token,
    }))
}

/// Argon2id with a fresh random salt, in PHC string form.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

pub fn create_token(secret: &str, user_id: i32, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        let argon2 = Argon2::default();
        assert!(argon2.verify_password(b"correct horse", &parsed).is_ok());
        assert!(argon2.verify_password(b"wrong horse", &parsed).is_err());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("correct horse").unwrap(),
            hash_password("correct horse").unwrap()
        );
    }
}
