//! 에러 타입: 도메인별 에러 정의

/// Mulescope 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum MulescopeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 흐름 분석 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// 프로젝트 스캔 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 흐름 분석 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// XML 문서를 트리로 만들 수 없음
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// 프로세서 분류표 로딩 실패
    #[error("processor registry error: {0}")]
    Registry(String),
}

/// 프로젝트 스캔 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 요청한 프로젝트가 없음
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// 매니페스트(pom.xml) 파싱 실패
    #[error("manifest parse failed: {0}")]
    ManifestParse(String),

    /// 경로 구분자나 `..`를 포함한 프로젝트 이름
    #[error("invalid project name: {0}")]
    InvalidProjectName(String),

    /// 스캔 실패
    #[error("scan failed: {0}")]
    ScanFailed(String),
}
