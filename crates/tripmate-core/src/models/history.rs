//! 일정 이력 모델.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::trip::TripRequest;

/// 사용자별 이력 조회 최대 개수
pub const HISTORY_LIMIT: usize = 20;

/// 저장된 (요청, 일정) 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    /// 레코드 ID
    pub id: i64,
    /// 소유 사용자 ID
    pub user_id: String,
    /// 원본 요청
    pub request: TripRequest,
    /// 생성된 일정 본문
    pub itinerary: String,
    /// 서버가 부여한 저장 시각
    pub created_at: DateTime<Utc>,
}
