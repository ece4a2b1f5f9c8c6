//! 흐름 분석기 설정
//!
//! [`FlowAnalyzerConfig`]는 core의 [`AnalyzerConfig`](mulescope_core::config::AnalyzerConfig)에서
//! 파생되며, 최대 중첩 깊이와 확장 분류표 경로를 가집니다.
//!
//! # 사용 예시
//!
//! ```
//! use mulescope_flow_analyzer::FlowAnalyzerConfigBuilder;
//!
//! let config = FlowAnalyzerConfigBuilder::new()
//!     .max_depth(128)
//!     .build()
//!     .unwrap();
//! let registry = config.load_registry().unwrap();
//! assert!(registry.is_processor("logger"));
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::FlowAnalyzerError;
use crate::registry::ProcessorRegistry;
use crate::tree::DEFAULT_MAX_DEPTH;

/// 설정 상한값 상수
const MAX_DEPTH_LIMIT: usize = 4096;
const MAX_PATH_LEN: usize = 4096;
const MAX_TABLE_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// 흐름 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowAnalyzerConfig {
    /// 허용 XML 중첩 깊이
    pub max_depth: usize,
    /// 기본 분류표에 병합할 TOML 경로 (빈 문자열이면 사용 안 함)
    pub processor_table: String,
}

impl Default for FlowAnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            processor_table: String::new(),
        }
    }
}

impl FlowAnalyzerConfig {
    /// core의 `AnalyzerConfig`에서 분석기 설정을 생성합니다.
    pub fn from_core(core: &mulescope_core::config::AnalyzerConfig) -> Self {
        Self {
            max_depth: core.max_depth,
            processor_table: core.processor_table.clone(),
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_depth`: 1-4096
    /// - `processor_table`: 비어 있거나, `..` 없는 4096자 이하 경로
    pub fn validate(&self) -> Result<(), FlowAnalyzerError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(FlowAnalyzerError::Config {
                field: "max_depth".to_owned(),
                reason: format!("must be 1-{MAX_DEPTH_LIMIT}"),
            });
        }

        if !self.processor_table.is_empty() {
            if Path::new(&self.processor_table)
                .components()
                .any(|c| c == Component::ParentDir)
            {
                return Err(FlowAnalyzerError::Config {
                    field: "processor_table".to_owned(),
                    reason: format!(
                        "path '{}' contains path traversal pattern '..'",
                        self.processor_table
                    ),
                });
            }

            if self.processor_table.len() > MAX_PATH_LEN {
                return Err(FlowAnalyzerError::Config {
                    field: "processor_table".to_owned(),
                    reason: format!("path exceeds maximum length {MAX_PATH_LEN}"),
                });
            }
        }

        Ok(())
    }

    /// 기본 분류표를 만들고, 설정된 확장 파일이 있으면 병합합니다.
    ///
    /// 시작 시 한 번 호출되는 것을 전제로 동기 I/O를 사용합니다.
    pub fn load_registry(&self) -> Result<ProcessorRegistry, FlowAnalyzerError> {
        let mut registry = ProcessorRegistry::builtin();
        if self.processor_table.is_empty() {
            return Ok(registry);
        }

        let path = &self.processor_table;
        let metadata = std::fs::metadata(path)
            .map_err(|e| FlowAnalyzerError::Registry(format!("{path}: {e}")))?;
        if metadata.len() > MAX_TABLE_FILE_SIZE {
            return Err(FlowAnalyzerError::Registry(format!(
                "{path}: {} bytes exceeds {MAX_TABLE_FILE_SIZE}",
                metadata.len()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| FlowAnalyzerError::Registry(format!("{path}: {e}")))?;
        registry.extend_from_toml(&content, path)?;

        tracing::info!(
            path = %path,
            processors = registry.len(),
            "loaded processor table extension"
        );
        Ok(registry)
    }
}

/// [`FlowAnalyzerConfig`] 빌더
#[derive(Default)]
pub struct FlowAnalyzerConfigBuilder {
    config: FlowAnalyzerConfig,
}

impl FlowAnalyzerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 중첩 깊이를 설정합니다.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// 확장 분류표 경로를 설정합니다.
    pub fn processor_table(mut self, path: impl Into<String>) -> Self {
        self.config.processor_table = path.into();
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `FlowAnalyzerError::Config` 반환
    pub fn build(self) -> Result<FlowAnalyzerConfig, FlowAnalyzerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
