//! # Session Routes
//!
//! Sign-in, sign-out and the company profile.
//!
//! ```text
//! POST /auth/login ──► check credentials ──► store "user" blob ──► JWT
//! POST /auth/logout ─► revoke token ──► drop cart ──► clear "user" blob
//! GET  /session ─────► { user: token owner, company }
//! PUT  /company-profile (admin) ──► store "companyInfo" blob
//! ```

use autoparts_core::session::Session;
use autoparts_core::{CompanyProfile, User};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{AuthUser, RequireAdmin};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    debug!(email = %request.email, "login");
    let user = state
        .db
        .sessions()
        .login(&request.email, &request.password)
        .await?;
    let issued = state.jwt.issue(&user)?;

    Ok(Json(LoginResponse {
        user,
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

pub async fn logout(user: AuthUser, State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.jwt.revoke(&user.jti)?;
    state.carts.discard(&user.id).await;
    state.db.sessions().logout().await?;

    info!(user_id = %user.id, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session(user: AuthUser, State(state): State<AppState>) -> ApiResult<Json<Session>> {
    let sessions = state.db.sessions();
    Ok(Json(Session {
        user: Some(sessions.user(&user.id).await?),
        company: sessions.company().await?,
    }))
}

pub async fn company_profile(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<CompanyProfile>> {
    Ok(Json(state.db.sessions().company().await?))
}

pub async fn update_company_profile(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(profile): Json<CompanyProfile>,
) -> ApiResult<Json<CompanyProfile>> {
    Ok(Json(state.db.sessions().update_company(profile).await?))
}
