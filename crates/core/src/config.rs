//! 설정 관리: mulescope.toml 파싱 및 런타임 설정
//!
//! [`MulescopeConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`MULESCOPE_SCANNER_PROJECTS_DIR=/srv/mule` 형식)
//! 3. 설정 파일 (`mulescope.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), mulescope_core::error::MulescopeError> {
//! use mulescope_core::config::MulescopeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = MulescopeConfig::load("mulescope.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = MulescopeConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, MulescopeError};

/// 경로 문자열 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// Mulescope 통합 설정
///
/// `mulescope.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MulescopeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// REST 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 프로젝트 스캐너 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// 흐름 분석기 설정
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl MulescopeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MulescopeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, MulescopeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MulescopeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                MulescopeError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, MulescopeError> {
        toml::from_str(toml_str).map_err(|e| {
            MulescopeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `MULESCOPE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "MULESCOPE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "MULESCOPE_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.host, "MULESCOPE_SERVER_HOST");
        override_u16(&mut self.server.port, "MULESCOPE_SERVER_PORT");

        // Scanner
        override_string(
            &mut self.scanner.projects_dir,
            "MULESCOPE_SCANNER_PROJECTS_DIR",
        );
        override_csv(
            &mut self.scanner.flow_locations,
            "MULESCOPE_SCANNER_FLOW_LOCATIONS",
        );
        override_usize(
            &mut self.scanner.max_file_size,
            "MULESCOPE_SCANNER_MAX_FILE_SIZE",
        );

        // Analyzer
        override_usize(&mut self.analyzer.max_depth, "MULESCOPE_ANALYZER_MAX_DEPTH");
        override_string(
            &mut self.analyzer.processor_table,
            "MULESCOPE_ANALYZER_PROCESSOR_TABLE",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "MULESCOPE_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "MULESCOPE_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "MULESCOPE_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), MulescopeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.server.host.is_empty() {
            return Err(invalid("server.host", "host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(invalid("server.port", "port must be greater than 0"));
        }

        validate_path("scanner.projects_dir", &self.scanner.projects_dir)?;

        if self.scanner.flow_locations.is_empty() {
            return Err(invalid(
                "scanner.flow_locations",
                "at least one flow location required",
            ));
        }

        for location in &self.scanner.flow_locations {
            validate_path("scanner.flow_locations", location)?;
        }

        if self.scanner.max_file_size == 0 {
            return Err(invalid(
                "scanner.max_file_size",
                "must be greater than 0",
            ));
        }

        if self.analyzer.max_depth == 0 {
            return Err(invalid("analyzer.max_depth", "must be greater than 0"));
        }

        if !self.analyzer.processor_table.is_empty() {
            validate_path("analyzer.processor_table", &self.analyzer.processor_table)?;
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(invalid(
                "metrics.port",
                "port must be greater than 0 when metrics are enabled",
            ));
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// REST 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 호스트
    pub host: String,
    /// 바인드 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

/// 프로젝트 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 프로젝트 디렉토리들이 모여 있는 루트 경로
    pub projects_dir: String,
    /// 프로젝트 기준 흐름 XML 위치 (직계 `*.xml`만 검색)
    pub flow_locations: Vec<String>,
    /// XML 파일 최대 크기 (바이트)
    pub max_file_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            projects_dir: ".".to_owned(),
            flow_locations: default_flow_locations(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// 기본 흐름 파일 위치 목록
pub fn default_flow_locations() -> Vec<String> {
    vec![
        "src/main/mule".to_owned(),
        "src/main/resources".to_owned(),
        "src/main/api".to_owned(),
        "src/main/flows".to_owned(),
    ]
}

/// 흐름 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// 허용하는 최대 XML 중첩 깊이
    pub max_depth: usize,
    /// 기본 분류표에 병합할 프로세서 정의 TOML 경로 (빈 문자열이면 사용 안 함)
    pub processor_table: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            processor_table: String::new(),
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus exporter 활성화 여부
    pub enabled: bool,
    /// 리슨 주소
    pub listen_addr: String,
    /// 리슨 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> MulescopeError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

fn validate_path(field: &str, value: &str) -> Result<(), MulescopeError> {
    if value.is_empty() {
        return Err(invalid(field, "path must not be empty"));
    }

    if Path::new(value)
        .components()
        .any(|c| c == Component::ParentDir)
    {
        return Err(invalid(
            field,
            format!("path '{value}' contains path traversal pattern '..'"),
        ));
    }

    if value.len() > MAX_PATH_LEN {
        return Err(invalid(
            field,
            format!("path exceeds maximum length {MAX_PATH_LEN}"),
        ));
    }

    Ok(())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
