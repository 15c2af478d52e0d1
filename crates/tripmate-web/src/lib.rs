//! # tripmate-web
//!
//! 로컬 웹 서버.
//! Axum 기반 REST API + 내장 단일 페이지 UI.
//!
//! ## 기능
//! - 가입 / 로그인 / 비밀번호 재설정 / 로그아웃
//! - 일정 생성 (성공한 일정만 이력 저장)
//! - 사용자별 최근 이력 조회
//! - 생성 엔드포인트 상태 조회
//! - 정적 파일 서빙 (UI)

pub mod embedded;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tripmate_core::config::WebConfig;
use tripmate_core::ports::history_store::HistoryStore;
use tripmate_core::ports::identity_provider::IdentityProvider;
use tripmate_core::ports::itinerary_generator::ItineraryGenerator;

use crate::session::SessionStore;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 일정 생성기
    pub generator: Arc<dyn ItineraryGenerator>,
    /// 신원 제공자
    pub identity: Arc<dyn IdentityProvider>,
    /// 이력 저장소
    pub history: Arc<dyn HistoryStore>,
    /// 로그인 세션
    pub sessions: Arc<SessionStore>,
    /// 시작 시 결정된 생성 엔드포인트 URL
    pub endpoint_url: Arc<str>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn ItineraryGenerator>,
        identity: Arc<dyn IdentityProvider>,
        history: Arc<dyn HistoryStore>,
        endpoint_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            generator,
            identity,
            history,
            sessions: Arc::new(SessionStore::new()),
            endpoint_url: endpoint_url.into(),
        }
    }
}

/// 라우터 구성 (API + 정적 UI)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(embedded::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 로컬 웹 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState, config: WebConfig) -> Self {
        Self { config, state }
    }

    /// 사용할 리스너 바인드
    ///
    /// 설정 포트부터 시작하여, 이미 사용 중이면 다음 포트를 시도한다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환한다.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let Some(port) = base_port.checked_add(attempt) else {
                break;
            };

            let addr: SocketAddr = match format!("{host}:{port}").parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {host}:{port}: {e}");
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                    }
                    return Ok(listener);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    warn!("포트 {port} 이미 사용 중, 다음 포트 시도...");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 실행 (종료 신호까지)
    ///
    /// 로그에 남는 주소는 실제로 바인드된 주소다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        info!("TripMate 웹 서버 시작: http://{addr}");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("웹 서버 종료");
        Ok(())
    }
}
