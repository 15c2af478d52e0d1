//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tripmate_core::error::{CoreError, IdentityError};

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),

    /// 리소스를 찾을 수 없음
    #[error("리소스를 찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 요청
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 세션 없음
    #[error("인증 필요: {0}")]
    Unauthorized(String),

    /// 신원 제공자 에러
    #[error("신원 제공자 에러: {0}")]
    Identity(#[from] IdentityError),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl ApiError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Identity(err) => identity_status(err),
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Internal(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Identity(err) => err.user_message(),
        }
    }
}

fn identity_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::WeakPassword | IdentityError::InvalidEmail | IdentityError::EmailNotFound => {
            StatusCode::BAD_REQUEST
        }
        IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        IdentityError::UserDisabled => StatusCode::FORBIDDEN,
        IdentityError::EmailExists => StatusCode::CONFLICT,
        IdentityError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
        IdentityError::Rejected(_) | IdentityError::Transport(_) => StatusCode::BAD_GATEWAY,
        IdentityError::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "API 에러: {self}");
        }

        let body = ErrorResponse {
            error: self.user_message(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => {
                ApiError::BadRequest(format!("{field}: {message}"))
            }
            CoreError::Auth(msg) => ApiError::Unauthorized(msg),
            CoreError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{resource_type} {id}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
