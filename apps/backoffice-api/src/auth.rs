//! JWT authentication module.
//!
//! Issues and validates access tokens, and provides the extractors that gate
//! the routes.
//!
//! ```text
//! POST /auth/login ──► SessionRepository::login ──► JwtManager::issue
//!                                                        │
//!                     Authorization: Bearer <token> ◄────┘
//!                                │
//!                                ▼
//!              AuthUser (any role)     RequireAdmin (admin only)
//! ```
//!
//! Tokens are stateless; `/auth/logout` revokes the token's `jti` for the rest
//! of the process lifetime.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use autoparts_core::{User, UserRole};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Role at sign-in time
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// JWT token manager.
#[derive(Debug)]
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
    revoked: Mutex<HashSet<String>>,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
            revoked: Mutex::new(HashSet::new()),
        }
    }

    /// Generate an access token for `user`.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: self.access_lifetime_secs,
        })
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        if self.is_revoked(&token_data.claims.jti)? {
            return Err(ApiError::unauthorized("Token has been revoked"));
        }

        Ok(token_data.claims)
    }

    /// Rejects the token with this `jti` from now on.
    pub fn revoke(&self, jti: &str) -> Result<(), ApiError> {
        self.revoked
            .lock()
            .map_err(|_| ApiError::internal("Token registry unavailable"))?
            .insert(jti.to_string());
        Ok(())
    }

    fn is_revoked(&self, jti: &str) -> Result<bool, ApiError> {
        Ok(self
            .revoked
            .lock()
            .map_err(|_| ApiError::internal("Token registry unavailable"))?
            .contains(jti))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that requires a valid access token (any role).
///
/// ```rust,ignore
/// async fn get_cart(user: AuthUser, State(state): State<AppState>) -> ApiResult<Json<CartView>> {
///     let cart = state.carts.snapshot(&user.id).await;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: UserRole,
    pub jti: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<JwtManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;
        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Expected a bearer token"))?;

        let jwt = Arc::<JwtManager>::from_ref(state);
        let claims = jwt.validate_token(token)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
            jti: claims.jti,
        })
    }
}

/// Extractor that requires an admin token.
///
/// Missing or invalid tokens get 401, seller tokens get 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    Arc<JwtManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}
