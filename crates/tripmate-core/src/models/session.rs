//! 로그인 세션 모델.
//!
//! 전역 상태 대신 세션 컨텍스트를 명시적으로 각 협력자 호출에 전달한다.
//! 로그인 시 생성되고 로그아웃 시 통째로 제거된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 신원 제공자가 확인한 사용자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 제공자 측 사용자 ID
    pub user_id: String,
    /// 이메일
    pub email: String,
}

/// 세션 컨텍스트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// 세션 ID (Bearer 토큰으로 사용)
    pub session_id: Uuid,
    /// 로그인한 사용자
    pub user: AuthenticatedUser,
    /// 세션 시작 시각
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    /// 새 세션 시작
    pub fn start(user: AuthenticatedUser) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user,
            created_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }
}
