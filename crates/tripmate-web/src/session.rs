//! 로그인 세션 레지스트리.
//!
//! 세션 ID는 `Authorization: Bearer <uuid>` 헤더로 전달된다.
//! 로그아웃하면 세션 컨텍스트 전체를 제거한다.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use parking_lot::RwLock;
use tracing::debug;
use tripmate_core::models::session::{AuthenticatedUser, SessionContext};
use uuid::Uuid;

use crate::error::ApiError;

/// 메모리 세션 저장소
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 세션 시작 후 등록
    pub fn create(&self, user: AuthenticatedUser) -> SessionContext {
        let session = SessionContext::start(user);
        self.sessions
            .write()
            .insert(session.session_id, session.clone());
        debug!(user_id = session.user_id(), "세션 생성");
        session
    }

    pub fn get(&self, session_id: &Uuid) -> Option<SessionContext> {
        self.sessions.read().get(session_id).cloned()
    }

    /// 세션 제거: 존재했으면 true
    pub fn remove(&self, session_id: &Uuid) -> bool {
        let removed = self.sessions.write().remove(session_id);
        if let Some(session) = &removed {
            debug!(user_id = session.user_id(), "세션 제거");
        }
        removed.is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// 요청 헤더에서 세션 조회 (없거나 모르는 ID면 401)
    pub fn require(&self, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
        let session_id = bearer_session_id(headers)
            .ok_or_else(|| ApiError::Unauthorized("Please sign in first.".to_string()))?;
        self.get(&session_id)
            .ok_or_else(|| ApiError::Unauthorized("Session expired. Please sign in again.".to_string()))
    }
}

/// `Authorization: Bearer <uuid>` 파싱
pub fn bearer_session_id(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    Uuid::parse_str(token).ok()
}
