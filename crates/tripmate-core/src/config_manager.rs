//! 설정 파일 관리.
//!
//! 설정(`config.json`)과 데이터(SQLite)는 같은 `ProjectDirs` 루트를 쓴다.
//! 첫 실행이면 기본 설정을 파일로 써 두고, 이후에는 파일을 읽기만 한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// `ProjectDirs` 식별자 (qualifier, organization, application)
const PROJECT_ID: (&str, &str, &str) = ("app", "tripmate", "tripmate");

/// 플랫폼별 프로젝트 디렉토리
///
/// - Linux: `~/.config/tripmate`, `~/.local/share/tripmate`
/// - macOS: `~/Library/Application Support/app.tripmate.tripmate`
/// - Windows: `%APPDATA%\tripmate\tripmate\{config,data}`
pub fn project_dirs() -> Option<ProjectDirs> {
    let (qualifier, organization, application) = PROJECT_ID;
    ProjectDirs::from(qualifier, organization, application)
}

/// 기본 데이터 디렉토리 (홈 디렉토리를 알 수 없으면 `None`)
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// 로드된 설정과 그 파일 경로
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json` 사용
    pub fn new() -> Result<Self, CoreError> {
        let dirs = project_dirs().ok_or_else(|| {
            CoreError::Config("홈 디렉토리를 찾을 수 없어 설정 경로를 정할 수 없습니다".to_string())
        })?;
        Self::with_path(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// 지정된 경로의 설정 파일 사용 (없으면 기본값으로 생성)
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = if config_path.exists() {
            read_config(&config_path)?
        } else {
            let config = AppConfig::default_config();
            write_config(&config_path, &config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정 (CLI 덮어쓰기용 복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
    })?;
    let config = serde_json::from_str(&content).map_err(|e| {
        CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })?;
    debug!("설정 파일 로드: {}", path.display());
    Ok(config)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
        })?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| {
        CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display()))
    })
}
