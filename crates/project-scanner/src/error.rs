//! 프로젝트 스캐너 에러 타입
//!
//! [`ProjectScannerError`]는 프로젝트 스캐너에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<ProjectScannerError> for MulescopeError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! 개별 흐름 파일의 파싱 실패는 에러로 전파되지 않고 경고 로그와 함께 건너뜁니다.

use mulescope_core::error::{ConfigError, MulescopeError, ScanError};

/// 프로젝트 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ProjectScannerError {
    /// pom.xml 파싱 실패
    #[error("manifest parse error: {path}: {reason}")]
    ManifestParse {
        /// 매니페스트 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 요청한 프로젝트 디렉토리가 없음
    #[error("Project {0} not found")]
    ProjectNotFound(String),

    /// 경로 구분자, `..` 등을 포함한 프로젝트 이름
    #[error("invalid project name: '{0}'")]
    InvalidProjectName(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 제한 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 크기
        size: u64,
        /// 허용 최대 크기
        max: usize,
    },

    /// 블로킹 태스크 실행 실패
    #[error("task error: {0}")]
    Task(String),
}

impl ProjectScannerError {
    /// 클라이언트 요청 문제(없는 프로젝트, 잘못된 이름)인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ProjectNotFound(_) | Self::InvalidProjectName(_))
    }
}

impl From<ProjectScannerError> for MulescopeError {
    fn from(err: ProjectScannerError) -> Self {
        match err {
            ProjectScannerError::ManifestParse { path, reason } => {
                MulescopeError::Scan(ScanError::ManifestParse(format!("{path}: {reason}")))
            }
            ProjectScannerError::ProjectNotFound(name) => {
                MulescopeError::Scan(ScanError::ProjectNotFound(name))
            }
            ProjectScannerError::InvalidProjectName(name) => {
                MulescopeError::Scan(ScanError::InvalidProjectName(name))
            }
            ProjectScannerError::Config { field, reason } => {
                MulescopeError::Config(ConfigError::InvalidValue { field, reason })
            }
            ProjectScannerError::Io { path, source } => MulescopeError::Scan(
                ScanError::ScanFailed(format!("io error: {path}: {source}")),
            ),
            ProjectScannerError::FileTooBig { path, size, max } => MulescopeError::Scan(
                ScanError::ScanFailed(format!("file too large: {path}: {size} bytes (max: {max})")),
            ),
            ProjectScannerError::Task(msg) => MulescopeError::Scan(ScanError::ScanFailed(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_not_found_display_matches_rest_detail() {
        let err = ProjectScannerError::ProjectNotFound("orders-api".to_owned());
        assert_eq!(err.to_string(), "Project orders-api not found");
    }

    #[test]
    fn file_too_big_display() {
        let err = ProjectScannerError::FileTooBig {
            path: "big.xml".to_owned(),
            size: 2048,
            max: 1024,
        };
        let msg = err.to_string();
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(ProjectScannerError::ProjectNotFound("x".to_owned()).is_client_error());
        assert!(ProjectScannerError::InvalidProjectName("..".to_owned()).is_client_error());
        assert!(!ProjectScannerError::Task("join".to_owned()).is_client_error());
    }

    #[test]
    fn converts_to_mulescope_scan_error() {
        let top: MulescopeError = ProjectScannerError::ProjectNotFound("x".to_owned()).into();
        assert!(matches!(
            top,
            MulescopeError::Scan(ScanError::ProjectNotFound(_))
        ));

        let top: MulescopeError = ProjectScannerError::Io {
            path: "/tmp/x".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(matches!(top, MulescopeError::Scan(ScanError::ScanFailed(_))));
    }

    #[test]
    fn config_error_converts_to_config_variant() {
        let top: MulescopeError = ProjectScannerError::Config {
            field: "max_file_size".to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into();
        assert!(matches!(
            top,
            MulescopeError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
