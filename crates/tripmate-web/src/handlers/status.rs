//! 상태 패널 API 핸들러.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::AppState;

/// 화면에 표시할 엔드포인트 URL 최대 길이
const ENDPOINT_DISPLAY_LEN: usize = 40;

/// 상태 응답 DTO
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// 설정된 엔드포인트 (표시용으로 잘림)
    pub endpoint: String,
    /// 생성 엔드포인트 응답 여부
    pub endpoint_reachable: bool,
    /// 이력 저장소 사용 가능 여부
    pub storage_ok: bool,
    /// 활성 세션 수
    pub active_sessions: usize,
}

/// 표시용 엔드포인트 URL (40자 초과 시 말줄임)
pub fn display_endpoint(url: &str) -> String {
    if url.chars().count() <= ENDPOINT_DISPLAY_LEN {
        return url.to_string();
    }
    let head: String = url.chars().take(ENDPOINT_DISPLAY_LEN).collect();
    format!("{head}...")
}

/// 서비스 상태
///
/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let endpoint_reachable = state.generator.check_endpoint(&state.endpoint_url).await;
    let storage_ok = match state.history.health_check().await {
        Ok(()) => true,
        Err(e) => {
            debug!("저장소 점검 실패: {e}");
            false
        }
    };

    Json(StatusResponse {
        endpoint: display_endpoint(&state.endpoint_url),
        endpoint_reachable,
        storage_ok,
        active_sessions: state.sessions.len(),
    })
}
