//! # tripmate-network
//!
//! HTTP 네트워크 어댑터.
//! 일정 생성 엔드포인트(Ollama 호환)와 신원 제공자(Identity Toolkit 호환 REST)를
//! 호출하며, 각 포트(`ItineraryGenerator`, `IdentityProvider`)를 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use tripmate_network::itinerary_client::OllamaItineraryClient;
//! use tripmate_network::identity_client::IdentityToolkitClient;
//! ```

pub mod identity_client;
pub mod itinerary_client;
pub mod prompt;
