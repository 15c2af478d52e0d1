//! TripMate 도메인 모델.
//!
//! 웹 계층과 어댑터가 공유하는 핵심 데이터 구조체를 정의한다.

pub mod history;
pub mod itinerary;
pub mod session;
pub mod trip;
