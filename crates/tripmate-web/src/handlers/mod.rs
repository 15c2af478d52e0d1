//! API 핸들러 모듈.

pub mod auth;
pub mod history;
pub mod itinerary;
pub mod status;

use axum::Json;
use serde::Serialize;
use tripmate_core::models::trip::{Pace, SUGGESTED_INTERESTS};

/// 속도 선택지
#[derive(Debug, Serialize)]
pub struct PaceOption {
    pub value: Pace,
    pub label: &'static str,
}

/// 요청 폼 선택지
#[derive(Debug, Serialize)]
pub struct TripOptionsResponse {
    pub paces: Vec<PaceOption>,
    pub default_pace: Pace,
    pub interests: Vec<&'static str>,
}

/// 폼 선택지 조회
///
/// GET /api/trip-options
pub async fn trip_options() -> Json<TripOptionsResponse> {
    Json(TripOptionsResponse {
        paces: Pace::ALL
            .iter()
            .map(|pace| PaceOption {
                value: *pace,
                label: pace.label(),
            })
            .collect(),
        default_pace: Pace::default(),
        interests: SUGGESTED_INTERESTS.to_vec(),
    })
}
