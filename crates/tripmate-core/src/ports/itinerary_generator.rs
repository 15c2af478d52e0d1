//! 일정 생성기 포트.
//!
//! 구현: `tripmate-network` crate (`OllamaItineraryClient`)

use async_trait::async_trait;

use crate::models::itinerary::ItineraryResult;
use crate::models::trip::TripRequest;

/// 일정 생성기: 여행 요청을 생성 엔드포인트로 보내고 결과를 분류한다
///
/// 실패는 에러로 올리지 않고 항상 [`ItineraryResult`]의 상태로 돌려준다.
/// 호출 사이에 상태를 공유하지 않는다.
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    /// 프로브 → 프롬프트 구성 → 생성 호출 → 응답 분류
    async fn generate(&self, request: &TripRequest, endpoint_base_url: &str) -> ItineraryResult;

    /// 생성 엔드포인트 활성 여부 (프로브만 수행)
    async fn check_endpoint(&self, endpoint_base_url: &str) -> bool;
}
