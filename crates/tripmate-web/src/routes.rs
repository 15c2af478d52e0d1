//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 인증
        .route("/auth/signup", post(handlers::auth::sign_up))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/password-reset", post(handlers::auth::password_reset))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        // 일정
        .route("/trip-options", get(handlers::trip_options))
        .route(
            "/itineraries",
            post(handlers::itinerary::generate_itinerary),
        )
        // 이력
        .route("/history", get(handlers::history::list_history))
        .route("/history/{id}", get(handlers::history::get_history))
        // 상태
        .route("/status", get(handlers::status::get_status))
}
