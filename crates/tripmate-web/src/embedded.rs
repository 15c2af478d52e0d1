//! 정적 파일 임베드 및 서빙.
//!
//! rust-embed로 `frontend/dist`의 단일 페이지 UI를 바이너리에 포함한다.

use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "frontend/dist"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.svg"]
#[include = "*.ico"]
struct Assets;

/// 정적 파일 서빙을 위한 fallback 핸들러
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    // 알 수 없는 API 경로는 UI로 넘기지 않는다
    if path.starts_with("api/") {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let cache_control = if path.ends_with(".html") {
                "no-cache"
            } else {
                "public, max-age=3600"
            };

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref()),
                    (header::CACHE_CONTROL, cache_control),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        // SPA: 알 수 없는 경로는 index.html
        None => match Assets::get("index.html") {
            Some(index) => Html(String::from_utf8_lossy(&index.data).to_string()).into_response(),
            None => (StatusCode::NOT_FOUND, "UI not bundled").into_response(),
        },
    }
}
