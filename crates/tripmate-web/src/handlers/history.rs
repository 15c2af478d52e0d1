//! 일정 이력 API 핸들러.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use tripmate_core::models::history::{HistoryRecord, HISTORY_LIMIT};

use crate::error::ApiError;
use crate::AppState;

/// 최근 이력 (최신순, 최대 20개)
///
/// GET /api/history
pub async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let session = state.sessions.require(&headers)?;
    let records = state.history.recent(&session, HISTORY_LIMIT).await?;
    Ok(Json(records))
}

/// 이력 단건 조회
///
/// GET /api/history/{id}
pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<HistoryRecord>, ApiError> {
    let session = state.sessions.require(&headers)?;
    state
        .history
        .get(&session, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("History record {id}")))
}
