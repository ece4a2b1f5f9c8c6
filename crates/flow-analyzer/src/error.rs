//! 흐름 분석기 에러 타입
//!
//! [`FlowAnalyzerError`]는 흐름 분석기에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<FlowAnalyzerError> for MulescopeError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! 분류와 추출은 잘 구성된 트리에 대해 항상 성공하므로,
//! 에러는 문서 파싱 단계와 설정/분류표 로딩 단계에서만 발생합니다.

use mulescope_core::error::{AnalysisError, ConfigError, MulescopeError};

/// 흐름 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum FlowAnalyzerError {
    /// XML 문서를 트리로 변환할 수 없음
    #[error("malformed document: {path}: {reason}")]
    MalformedDocument {
        /// 원본 파일 식별자
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 허용 깊이를 넘는 중첩
    #[error("document too deep: {path}: nesting exceeds {max_depth}")]
    TooDeep {
        /// 원본 파일 식별자
        path: String,
        /// 허용된 최대 깊이
        max_depth: usize,
    },

    /// 프로세서 분류표 로딩 실패
    #[error("processor registry error: {0}")]
    Registry(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl FlowAnalyzerError {
    /// 문서 단위로 건너뛰어야 하는 에러인지 확인합니다.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. } | Self::TooDeep { .. })
    }
}

impl From<FlowAnalyzerError> for MulescopeError {
    fn from(err: FlowAnalyzerError) -> Self {
        match err {
            FlowAnalyzerError::MalformedDocument { path, reason } => MulescopeError::Analysis(
                AnalysisError::MalformedDocument(format!("{path}: {reason}")),
            ),
            FlowAnalyzerError::TooDeep { path, max_depth } => {
                MulescopeError::Analysis(AnalysisError::MalformedDocument(format!(
                    "{path}: nesting exceeds {max_depth}"
                )))
            }
            FlowAnalyzerError::Registry(msg) => {
                MulescopeError::Analysis(AnalysisError::Registry(msg))
            }
            FlowAnalyzerError::Config { field, reason } => {
                MulescopeError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
