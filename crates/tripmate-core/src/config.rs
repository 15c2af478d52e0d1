//! 애플리케이션 설정 구조체.
//!
//! 생성 엔드포인트, 신원 제공자, 저장소 경로, 웹 서버 설정을 정의한다.
//! [`crate::config_manager::ConfigManager`]가 JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// 신원 제공자 API 키 환경 변수
pub const IDENTITY_API_KEY_ENV: &str = "TRIPMATE_IDENTITY_API_KEY";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 일정 생성 엔드포인트 설정
    #[serde(default)]
    pub generation: GenerationConfig,
    /// 신원 제공자 설정
    #[serde(default)]
    pub identity: IdentityConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
}

// ============================================================
// 생성 엔드포인트 설정
// ============================================================

/// 일정 생성 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// 엔드포인트 기본 URL (터널 URL)
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// 현재 터널 URL이 담긴 텍스트 파일 (있으면 시작 시 한 번 읽어 우선 적용)
    #[serde(default)]
    pub endpoint_file: Option<PathBuf>,
    /// 모델 식별자
    #[serde(default = "default_model")]
    pub model: String,
    /// 샘플링 온도
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 최대 생성 토큰 수
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,
    /// 프로브 타임아웃 (초)
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// 생성 요청 타임아웃 (초)
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
    /// 일정 작성 언어
    #[serde(default = "default_response_language")]
    pub response_language: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            endpoint_file: None,
            model: default_model(),
            temperature: default_temperature(),
            num_predict: default_num_predict(),
            probe_timeout_secs: default_probe_timeout_secs(),
            generation_timeout_secs: default_generation_timeout_secs(),
            response_language: default_response_language(),
        }
    }
}

impl GenerationConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// 실제로 사용할 엔드포인트 URL 결정
    ///
    /// `endpoint_file`이 있고 내용이 비어 있지 않으면 그 값을, 아니면 `endpoint_url`을 쓴다.
    pub fn resolve_endpoint_url(&self) -> String {
        self.endpoint_file
            .as_deref()
            .and_then(read_endpoint_file)
            .unwrap_or_else(|| self.endpoint_url.trim().to_string())
    }
}

/// 엔드포인트 URL 파일 읽기 (없거나 비어 있으면 None)
fn read_endpoint_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let url = content.trim();
            if url.is_empty() {
                warn!("엔드포인트 파일이 비어 있음: {}", path.display());
                None
            } else {
                debug!("엔드포인트 파일 로드: {}", path.display());
                Some(url.to_string())
            }
        }
        Err(e) => {
            warn!("엔드포인트 파일 읽기 실패: {}: {e}", path.display());
            None
        }
    }
}

// ============================================================
// 신원 제공자 설정
// ============================================================

/// 신원 제공자(Identity Toolkit 호환 REST) 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// REST 기본 URL
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    /// API 키 (비어 있으면 환경 변수 사용)
    #[serde(default)]
    pub api_key: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_identity_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: default_identity_base_url(),
            api_key: String::new(),
            timeout_secs: default_identity_timeout_secs(),
        }
    }
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 설정 파일 값 → 환경 변수 순으로 API 키 결정
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(IDENTITY_API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite DB 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 8501)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_endpoint_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "mistral".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_num_predict() -> u32 {
    1500
}
fn default_probe_timeout_secs() -> u64 {
    5
}
fn default_generation_timeout_secs() -> u64 {
    180
}
fn default_response_language() -> String {
    "Vietnamese".to_string()
}
fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}
fn default_identity_timeout_secs() -> u64 {
    10
}
fn default_web_port() -> u16 {
    8501
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generation_defaults() {
        let config = AppConfig::default_config();
        assert_eq!(config.generation.model, "mistral");
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.generation.num_predict, 1500);
        assert_eq!(config.generation.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.generation.generation_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn endpoint_file_overrides_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ollama_url.txt");
        std::fs::write(&path, "  https://abc.trycloudflare.com/\n").unwrap();

        let config = GenerationConfig {
            endpoint_file: Some(path),
            ..GenerationConfig::default()
        };
        assert_eq!(config.resolve_endpoint_url(), "https://abc.trycloudflare.com/");
    }

    #[test]
    fn missing_or_empty_endpoint_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n").unwrap();

        let config = GenerationConfig {
            endpoint_url: "http://fallback:11434".to_string(),
            endpoint_file: Some(empty),
            ..GenerationConfig::default()
        };
        assert_eq!(config.resolve_endpoint_url(), "http://fallback:11434");

        let config = GenerationConfig {
            endpoint_file: Some(dir.path().join("missing.txt")),
            ..config
        };
        assert_eq!(config.resolve_endpoint_url(), "http://fallback:11434");
    }

    #[test]
    fn configured_api_key_wins() {
        let config = IdentityConfig {
            api_key: " key-123 ".to_string(),
            ..IdentityConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("key-123"));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"generation":{"model":"llama3"}}"#).unwrap();
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.generation.num_predict, 1500);
        assert_eq!(config.web.port, 8501);
    }
}
