//! 일정 이력 저장소 포트.
//!
//! 구현: `tripmate-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::history::HistoryRecord;
use crate::models::session::SessionContext;
use crate::models::trip::TripRequest;

/// 사용자별 일정 이력 저장소
///
/// 모든 호출은 세션 컨텍스트를 받아 그 사용자 범위 안에서만 동작한다.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 이력 저장 (저장 시각은 저장소가 부여)
    async fn save(
        &self,
        session: &SessionContext,
        request: &TripRequest,
        itinerary: &str,
    ) -> Result<HistoryRecord, CoreError>;

    /// 최근 이력 조회: 최신순, 최대 `HISTORY_LIMIT`개
    async fn recent(
        &self,
        session: &SessionContext,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, CoreError>;

    /// 단건 조회 (세션 사용자 소유일 때만)
    async fn get(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<Option<HistoryRecord>, CoreError>;

    /// 저장소 사용 가능 여부 점검
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
