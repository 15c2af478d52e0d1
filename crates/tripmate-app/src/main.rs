//! # tripmate-app
//!
//! TripMate 바이너리 진입점.
//! 설정 로드, 어댑터 생성(DI), 웹 서버 실행, 라이프사이클 관리.

mod lifecycle;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tripmate_core::config::{AppConfig, IDENTITY_API_KEY_ENV};
use tripmate_core::config_manager::{default_data_dir, ConfigManager};
use tripmate_network::identity_client::IdentityToolkitClient;
use tripmate_network::itinerary_client::OllamaItineraryClient;
use tripmate_storage::sqlite::SqliteStorage;
use tripmate_web::{AppState, WebServer};

use crate::lifecycle::LifecycleManager;

/// DB 파일 이름
const DB_FILE_NAME: &str = "tripmate.db";

/// TripMate: 여행 일정 생성 웹 앱
#[derive(Parser, Debug)]
#[command(name = "tripmate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 생성 엔드포인트 URL (설정 파일 값보다 우선)
    #[arg(long, short = 'e')]
    endpoint: Option<String>,

    /// 엔드포인트 URL이 담긴 텍스트 파일 (예: ollama_url.txt)
    #[arg(long)]
    endpoint_file: Option<PathBuf>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 웹 서버 포트
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 데이터 저장 디렉토리
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 외부 접근 허용 (0.0.0.0 바인드)
    #[arg(long)]
    allow_external: bool,
}

impl Args {
    /// CLI 인자를 설정 위에 덮어쓴다
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.generation.endpoint_url = endpoint.clone();
        }
        if let Some(file) = &self.endpoint_file {
            config.generation.endpoint_file = Some(file.clone());
        }
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if self.allow_external {
            config.web.allow_external = true;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.db_path = Some(dir.join(DB_FILE_NAME));
        }
    }
}

/// 데이터베이스 경로 결정 (설정 값, 없으면 설정 파일과 같은 프로젝트의 데이터 디렉토리)
fn resolve_db_path(configured: Option<&Path>) -> PathBuf {
    configured
        .map(Path::to_path_buf)
        .or_else(|| default_data_dir().map(|dir| dir.join(DB_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

fn load_config(args: &Args) -> Result<ConfigManager> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", manager.config_path().display());
    Ok(manager)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "tripmate={lvl},tripmate_app={lvl},tripmate_core={lvl},tripmate_network={lvl},tripmate_storage={lvl},tripmate_web={lvl},tower_http=warn",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("TripMate 시작 (v{})", env!("CARGO_PKG_VERSION"));

    let config_manager = load_config(&args)?;
    let mut config = config_manager.get();
    args.apply_overrides(&mut config);

    // ── 생성 엔드포인트 (시작 시 한 번 결정) ──
    let endpoint_url = config.generation.resolve_endpoint_url();
    info!(
        endpoint = %endpoint_url,
        model = %config.generation.model,
        "생성 엔드포인트 설정"
    );
    let generator = Arc::new(
        OllamaItineraryClient::new(&config.generation).context("일정 생성 클라이언트 생성 실패")?,
    );

    // ── 신원 제공자 ──
    let api_key = config.identity.resolve_api_key().ok_or_else(|| {
        anyhow!(
            "신원 제공자 API 키가 없습니다. 설정 파일의 identity.api_key 또는 {IDENTITY_API_KEY_ENV} 환경 변수를 지정하세요"
        )
    })?;
    let identity = Arc::new(
        IdentityToolkitClient::new(&config.identity, api_key)
            .context("신원 제공자 클라이언트 생성 실패")?,
    );

    // ── 이력 저장소 ──
    let db_path = resolve_db_path(config.storage.db_path.as_deref());
    let history = Arc::new(SqliteStorage::open(&db_path).context("이력 저장소 열기 실패")?);
    info!("이력 저장소: {}", db_path.display());

    // ── 웹 서버 ──
    let state = AppState::new(generator, identity, history, endpoint_url.as_str());
    let web_server = WebServer::new(state, config.web.clone());

    let lifecycle = LifecycleManager::new();
    let web_shutdown_rx = lifecycle.subscribe();
    let mut server_task = tokio::spawn(async move { web_server.run(web_shutdown_rx).await });

    let early_exit = tokio::select! {
        _ = lifecycle.wait_for_signal() => None,
        result = &mut server_task => Some(result),
    };

    // 시그널로 종료한 경우 진행 중인 요청이 끝날 때까지 대기
    let result = match early_exit {
        Some(result) => {
            warn!("웹 서버가 먼저 종료됨");
            result
        }
        None => server_task.await,
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("웹 서버 오류: {e}");
            return Err(e).context("웹 서버 실행 실패");
        }
        Err(e) => return Err(anyhow!("웹 서버 태스크 실패: {e}")),
    }

    info!("TripMate 종료");
    Ok(())
}
