//! 일정 생성 API 핸들러.
//!
//! 요청 검증 → 생성 → 상태가 `Ok`일 때만 이력 저장.
//! 생성 실패는 사용자에게 보여줄 결과이므로 HTTP 200으로 상태와 메시지를 돌려준다.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tripmate_core::error::CoreError;
use tripmate_core::models::itinerary::ItineraryStatus;
use tripmate_core::models::trip::{Pace, TripRequest};

use crate::error::ApiError;
use crate::AppState;

/// 일정 생성 요청 DTO
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub date_spec: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub pace: Pace,
}

/// 일정 생성 응답 DTO
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: ItineraryStatus,
    pub message: String,
    /// 생성된 일정 (`Ok`가 아니면 빈 문자열)
    pub itinerary: String,
    /// 이력 저장 여부
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    /// 저장 실패 등 비치명적 경고
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 일정 생성
///
/// POST /api/itineraries
pub async fn generate_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let session = state.sessions.require(&headers)?;

    let request = TripRequest::new(
        req.origin,
        req.destination,
        req.date_spec,
        req.interests,
        req.pace,
    )
    .map_err(|e| match e {
        CoreError::Validation { .. } => ApiError::BadRequest("Please enter a destination.".into()),
        other => other.into(),
    })?;

    let result = state
        .generator
        .generate(&request, &state.endpoint_url)
        .await;
    info!(
        user_id = session.user_id(),
        destination = request.destination(),
        status = %result.status,
        "일정 생성 결과"
    );

    let mut response = GenerateResponse {
        status: result.status,
        message: result.message.clone(),
        itinerary: String::new(),
        saved: false,
        record_id: None,
        warning: None,
    };

    if !result.is_persistable() {
        return Ok(Json(response));
    }

    match state
        .history
        .save(&session, &request, &result.raw_text)
        .await
    {
        Ok(record) => {
            response.saved = true;
            response.record_id = Some(record.id);
        }
        Err(e) => {
            warn!(user_id = session.user_id(), "이력 저장 실패: {e}");
            response.warning = Some(format!("Could not save to history: {e}"));
        }
    }
    response.itinerary = result.raw_text;

    Ok(Json(response))
}
