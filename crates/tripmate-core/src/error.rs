//! TripMate 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.
//! 신원 제공자 경계의 에러는 [`IdentityError`]로 분리한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 인증 실패 (세션 없음, 만료 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "HistoryRecord")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 신원 제공자(REST) 에러.
///
/// 제공자가 돌려주는 `error.message` 코드를 타입으로 옮긴 것.
/// 각 variant는 [`IdentityError::user_message`]로 사용자 표시 문구를 제공한다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// 이미 가입된 이메일
    #[error("EMAIL_EXISTS")]
    EmailExists,

    /// 비밀번호 강도 부족 (6자 미만)
    #[error("WEAK_PASSWORD")]
    WeakPassword,

    /// 이메일 또는 비밀번호 불일치
    #[error("INVALID_LOGIN_CREDENTIALS")]
    InvalidCredentials,

    /// 가입되지 않은 이메일
    #[error("EMAIL_NOT_FOUND")]
    EmailNotFound,

    /// 이메일 형식 오류
    #[error("INVALID_EMAIL")]
    InvalidEmail,

    /// 비활성화된 계정
    #[error("USER_DISABLED")]
    UserDisabled,

    /// 시도 횟수 초과
    #[error("TOO_MANY_ATTEMPTS_TRY_LATER")]
    TooManyAttempts,

    /// 알 수 없는 코드로 거절됨
    #[error("신원 제공자 거절: {0}")]
    Rejected(String),

    /// 요청 타임아웃
    #[error("신원 제공자 타임아웃")]
    Timeout,

    /// 연결 실패 등 전송 계층 에러
    #[error("신원 제공자 통신 실패: {0}")]
    Transport(String),
}

/// 비밀번호 최소 길이
pub const MIN_PASSWORD_LEN: usize = 6;

impl IdentityError {
    /// 제공자 에러 코드 → 타입 매핑
    ///
    /// 제공자는 `"WEAK_PASSWORD : Password should be at least 6 characters"`처럼
    /// 코드 뒤에 설명을 붙이기도 하므로 포함 여부로 판별한다.
    pub fn from_code(code: &str) -> Self {
        if code.contains("EMAIL_EXISTS") {
            Self::EmailExists
        } else if code.contains("WEAK_PASSWORD") {
            Self::WeakPassword
        } else if code.contains("INVALID_PASSWORD") || code.contains("INVALID_LOGIN_CREDENTIALS")
        {
            Self::InvalidCredentials
        } else if code.contains("EMAIL_NOT_FOUND") {
            Self::EmailNotFound
        } else if code.contains("INVALID_EMAIL") {
            Self::InvalidEmail
        } else if code.contains("USER_DISABLED") {
            Self::UserDisabled
        } else if code.contains("TOO_MANY_ATTEMPTS_TRY_LATER") {
            Self::TooManyAttempts
        } else {
            Self::Rejected(code.to_string())
        }
    }

    /// 사용자에게 보여줄 문구
    pub fn user_message(&self) -> String {
        match self {
            Self::EmailExists => "This email is already registered.".to_string(),
            Self::WeakPassword => format!(
                "Password is too weak. Use at least {MIN_PASSWORD_LEN} characters."
            ),
            Self::InvalidCredentials => "Wrong email or password.".to_string(),
            Self::EmailNotFound => "This email is not registered.".to_string(),
            Self::InvalidEmail => "Invalid email address.".to_string(),
            Self::UserDisabled => "This account has been disabled.".to_string(),
            Self::TooManyAttempts => {
                "Too many attempts. Please wait a few minutes and try again.".to_string()
            }
            Self::Rejected(code) => format!("Request rejected: {code}"),
            Self::Timeout => "Timed out. Check your network connection.".to_string(),
            Self::Transport(detail) => format!("Could not reach the sign-in service: {detail}"),
        }
    }
}
