//! 프로젝트 스캐너 설정
//!
//! [`ProjectScannerConfig`]는 core의 [`ScannerConfig`](mulescope_core::config::ScannerConfig)에서
//! 파생됩니다.
//!
//! # 사용 예시
//!
//! ```
//! use mulescope_project_scanner::ProjectScannerConfigBuilder;
//!
//! let config = ProjectScannerConfigBuilder::new()
//!     .projects_dir("/srv/mule")
//!     .max_file_size(1024 * 1024)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.flow_locations.len(), 4);
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::ProjectScannerError;

/// 설정 상한값 상수
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB
const MAX_PATH_LEN: usize = 4096;
const MAX_FLOW_LOCATIONS: usize = 64;

/// 프로젝트 스캐너 설정
///
/// # 필드
///
/// - **projects_dir**: 프로젝트 디렉토리들이 모여 있는 루트
/// - **flow_locations**: 프로젝트 기준 흐름 XML 위치 (재귀 없이 직계 파일만)
/// - **max_file_size**: XML 파일 최대 크기 (바이트)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectScannerConfig {
    /// 프로젝트 루트 디렉토리
    pub projects_dir: String,
    /// 흐름 XML 위치 목록
    pub flow_locations: Vec<String>,
    /// XML 파일 최대 허용 크기 (바이트)
    pub max_file_size: usize,
}

impl Default for ProjectScannerConfig {
    fn default() -> Self {
        Self::from_core(&mulescope_core::config::ScannerConfig::default())
    }
}

impl ProjectScannerConfig {
    /// core의 `ScannerConfig`에서 스캐너 설정을 생성합니다.
    pub fn from_core(core: &mulescope_core::config::ScannerConfig) -> Self {
        Self {
            projects_dir: core.projects_dir.clone(),
            flow_locations: core.flow_locations.clone(),
            max_file_size: core.max_file_size,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # Errors
    ///
    /// 빈 경로, `..` 포함 경로, 범위를 벗어난 크기에 대해 `ProjectScannerError::Config` 반환
    pub fn validate(&self) -> Result<(), ProjectScannerError> {
        validate_path("projects_dir", &self.projects_dir)?;

        if self.flow_locations.is_empty() {
            return Err(config_error(
                "flow_locations",
                "at least one flow location required",
            ));
        }

        if self.flow_locations.len() > MAX_FLOW_LOCATIONS {
            return Err(config_error(
                "flow_locations",
                format!("at most {MAX_FLOW_LOCATIONS} flow locations allowed"),
            ));
        }

        for location in &self.flow_locations {
            validate_path("flow_locations", location)?;
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(config_error(
                "max_file_size",
                format!("must be 1-{MAX_FILE_SIZE}"),
            ));
        }

        Ok(())
    }
}

fn config_error(field: &str, reason: impl Into<String>) -> ProjectScannerError {
    ProjectScannerError::Config {
        field: field.to_owned(),
        reason: reason.into(),
    }
}

fn validate_path(field: &str, value: &str) -> Result<(), ProjectScannerError> {
    if value.is_empty() {
        return Err(config_error(field, "path must not be empty"));
    }

    if value.len() > MAX_PATH_LEN {
        return Err(config_error(
            field,
            format!("path exceeds {MAX_PATH_LEN} bytes"),
        ));
    }

    if Path::new(value)
        .components()
        .any(|c| c == Component::ParentDir)
    {
        return Err(config_error(
            field,
            format!("path '{value}' contains path traversal pattern '..'"),
        ));
    }

    Ok(())
}

/// [`ProjectScannerConfig`] 빌더
#[derive(Default)]
pub struct ProjectScannerConfigBuilder {
    config: ProjectScannerConfig,
}

impl ProjectScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 프로젝트 루트 디렉토리를 설정합니다.
    pub fn projects_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.projects_dir = dir.into();
        self
    }

    /// 흐름 XML 위치 목록을 설정합니다.
    pub fn flow_locations(mut self, locations: Vec<String>) -> Self {
        self.config.flow_locations = locations;
        self
    }

    /// XML 파일 최대 크기를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ProjectScannerError::Config` 반환
    pub fn build(self) -> Result<ProjectScannerConfig, ProjectScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
