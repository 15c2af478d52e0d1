//! 일정 이력 스토리지 (HistoryStore 포트 구현).
//!
//! 모든 쿼리는 세션 사용자 ID로 범위를 제한한다.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use tripmate_core::error::CoreError;
use tripmate_core::models::history::{HistoryRecord, HISTORY_LIMIT};
use tripmate_core::models::session::SessionContext;
use tripmate_core::models::trip::{Pace, TripRequest};
use tripmate_core::ports::history_store::HistoryStore;

use super::SqliteStorage;

const SELECT_COLUMNS: &str =
    "id, user_id, origin, destination, date_spec, interests, pace, itinerary, created_at";

/// DB 행 원본 (변환 전)
struct HistoryRow {
    id: i64,
    user_id: String,
    origin: String,
    destination: String,
    date_spec: String,
    interests: String,
    pace: String,
    itinerary: String,
    created_at: String,
}

impl HistoryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            origin: row.get(2)?,
            destination: row.get(3)?,
            date_spec: row.get(4)?,
            interests: row.get(5)?,
            pace: row.get(6)?,
            itinerary: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<HistoryRecord, CoreError> {
        let interests: Vec<String> = serde_json::from_str(&self.interests)?;
        let pace: Pace = serde_json::from_value(serde_json::Value::String(self.pace))?;
        let request = TripRequest::new(
            self.origin,
            self.destination,
            self.date_spec,
            interests,
            pace,
        )?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| CoreError::Internal(format!("저장 시각 파싱 실패: {e}")))?
            .with_timezone(&Utc);

        Ok(HistoryRecord {
            id: self.id,
            user_id: self.user_id,
            request,
            itinerary: self.itinerary,
            created_at,
        })
    }
}

fn pace_to_db(pace: Pace) -> Result<String, CoreError> {
    match serde_json::to_value(pace)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(CoreError::Internal(format!("속도 직렬화 형식 오류: {other}"))),
    }
}

#[async_trait]
impl HistoryStore for SqliteStorage {
    async fn save(
        &self,
        session: &SessionContext,
        request: &TripRequest,
        itinerary: &str,
    ) -> Result<HistoryRecord, CoreError> {
        let interests = serde_json::to_string(request.interests())?;
        let pace = pace_to_db(request.pace())?;
        let created_at = Utc::now();

        let id = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;

            conn.execute(
                "INSERT INTO itineraries
                    (user_id, origin, destination, date_spec, interests, pace, itinerary, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    session.user_id(),
                    request.origin(),
                    request.destination(),
                    request.date_spec(),
                    interests,
                    pace,
                    itinerary,
                    created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )
            .map_err(|e| CoreError::Internal(format!("이력 저장 실패: {e}")))?;

            conn.last_insert_rowid()
        };

        debug!(
            id,
            user_id = session.user_id(),
            destination = request.destination(),
            "일정 이력 저장"
        );

        Ok(HistoryRecord {
            id,
            user_id: session.user_id().to_string(),
            request: request.clone(),
            itinerary: itinerary.to_string(),
            created_at,
        })
    }

    async fn recent(
        &self,
        session: &SessionContext,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, CoreError> {
        let limit = limit.min(HISTORY_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows: Vec<HistoryRow> = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM itineraries
                     WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?2"
                ))
                .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

            let rows = stmt
                .query_map(
                    rusqlite::params![session.user_id(), limit as i64],
                    HistoryRow::from_row,
                )
                .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            rows
        };

        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    async fn get(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<Option<HistoryRecord>, CoreError> {
        let row = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;

            let result = conn.query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM itineraries WHERE id = ?1 AND user_id = ?2"
                ),
                rusqlite::params![id, session.user_id()],
                HistoryRow::from_row,
            );

            match result {
                Ok(row) => row,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(CoreError::Internal(format!("이력 조회 실패: {e}"))),
            }
        };

        row.into_record().map(Some)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| CoreError::Internal(format!("저장소 점검 실패: {e}")))?;
        Ok(())
    }
}
