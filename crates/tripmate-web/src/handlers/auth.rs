//! 인증 API 핸들러.
//!
//! 가입/로그인에 성공하면 새 세션을 만들어 세션 ID를 돌려준다.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use tripmate_core::models::session::{AuthenticatedUser, SessionContext};

use crate::error::ApiError;
use crate::session::bearer_session_id;
use crate::AppState;

/// 가입/로그인 요청 DTO
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// 비밀번호 재설정 요청 DTO
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// 세션 응답 DTO
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer 토큰으로 쓸 세션 ID
    pub session_id: String,
    pub user: AuthenticatedUser,
}

impl From<SessionContext> for SessionResponse {
    fn from(session: SessionContext) -> Self {
        Self {
            session_id: session.session_id.to_string(),
            user: session.user,
        }
    }
}

/// 단순 메시지 응답
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 가입
///
/// POST /api/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state.identity.sign_up(&req.email, &req.password).await?;
    info!(user_id = %user.user_id, "가입 완료");
    Ok(Json(state.sessions.create(user).into()))
}

/// 로그인
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state.identity.sign_in(&req.email, &req.password).await?;
    info!(user_id = %user.user_id, "로그인");
    Ok(Json(state.sessions.create(user).into()))
}

/// 비밀번호 재설정 메일 발송
///
/// POST /api/auth/password-reset
pub async fn password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.identity.send_password_reset(&req.email).await?;
    Ok(Json(MessageResponse {
        message: format!(
            "A password reset email has been sent to {}.",
            req.email.trim()
        ),
    }))
}

/// 로그아웃: 세션 전체 제거
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let session_id = bearer_session_id(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Please sign in first.".to_string()))?;
    if !state.sessions.remove(&session_id) {
        return Err(ApiError::Unauthorized(
            "Session expired. Please sign in again.".to_string(),
        ));
    }
    info!("로그아웃");
    Ok(Json(MessageResponse {
        message: "Signed out.".to_string(),
    }))
}

/// 현재 세션 사용자
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.require(&headers)?;
    Ok(Json(session.into()))
}
