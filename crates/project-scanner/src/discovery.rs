//! 프로젝트 및 흐름 파일 탐색 (동기 I/O)
//!
//! 이 모듈의 함수는 모두 블로킹 파일 시스템 호출을 하므로
//! `tokio::task::spawn_blocking` 안에서 호출되어야 합니다.
//!
//! # 디렉토리 규칙
//!
//! ```text
//! projects_dir/
//!   orders-api/              <- 프로젝트 (숨김이 아닌 직계 디렉토리)
//!     pom.xml                <- 매니페스트
//!     src/main/mule/*.xml    <- 흐름 파일 (위치별 직계 파일만, 재귀 없음)
//!     src/main/resources/*.xml
//!   .git/                    <- 숨김 디렉토리는 무시
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ProjectScannerError;

/// 프로젝트 매니페스트 파일명
pub const MANIFEST_FILENAME: &str = "pom.xml";

/// 흐름 파일 확장자
const FLOW_EXTENSION: &str = "xml";

/// 흐름 파일 탐지기
///
/// 프로젝트 디렉토리 기준 상대 위치 목록을 가지고, 각 위치의 직계 `*.xml` 파일을 찾습니다.
#[derive(Debug, Clone)]
pub struct FlowFileDetector {
    /// 프로젝트 기준 흐름 위치 목록 (검색 순서)
    flow_locations: Vec<String>,
}

impl FlowFileDetector {
    /// 주어진 위치 목록으로 탐지기를 생성합니다.
    pub fn new(flow_locations: Vec<String>) -> Self {
        Self { flow_locations }
    }

    /// 검색 위치 목록을 반환합니다.
    pub fn flow_locations(&self) -> &[String] {
        &self.flow_locations
    }

    /// 주어진 경로가 흐름 파일 이름 규칙(`*.xml`)에 맞는지 확인합니다.
    pub fn is_flow_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == FLOW_EXTENSION)
    }

    /// 프로젝트의 흐름 파일 목록을 반환합니다.
    ///
    /// 위치 순서대로, 각 위치 안에서는 파일 이름 순으로 정렬됩니다.
    /// 없는 위치는 조용히 건너뛰고, 읽을 수 없는 위치는 경고 후 건너뜁니다.
    pub fn flow_files(&self, project_dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for location in &self.flow_locations {
            let dir = project_dir.join(location);
            if !dir.is_dir() {
                continue;
            }

            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "failed to read flow location");
                    continue;
                }
            };

            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry.path()),
                    Err(e) => {
                        warn!(error = %e, "failed to read directory entry");
                        None
                    }
                })
                .filter(|path| self.is_flow_file(path) && path.is_file())
                .collect();
            found.sort();

            debug!(dir = %dir.display(), files = found.len(), "flow location scanned");
            files.extend(found);
        }

        files
    }
}

impl Default for FlowFileDetector {
    fn default() -> Self {
        Self::new(mulescope_core::config::default_flow_locations())
    }
}

/// 프로젝트 루트의 직계 디렉토리 중 숨김이 아닌 것을 이름 순으로 반환합니다.
///
/// 루트 디렉토리가 없으면 경고 후 빈 목록을 반환합니다.
///
/// # Errors
///
/// 루트 디렉토리는 있지만 읽을 수 없으면 `ProjectScannerError::Io`
pub fn list_projects(projects_dir: &Path) -> Result<Vec<PathBuf>, ProjectScannerError> {
    if !projects_dir.exists() {
        warn!(dir = %projects_dir.display(), "projects directory does not exist");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(projects_dir).map_err(|e| ProjectScannerError::Io {
        path: projects_dir.display().to_string(),
        source: e,
    })?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry");
                continue;
            }
        };

        let path = entry.path();
        let hidden = entry.file_name().to_str().is_none_or(|n| n.starts_with('.'));
        if hidden || !path.is_dir() {
            continue;
        }
        projects.push(path);
    }

    projects.sort();
    Ok(projects)
}

/// 프로젝트의 매니페스트 경로를 반환합니다. 파일이 없으면 `None`입니다.
pub fn manifest_path(project_dir: &Path) -> Option<PathBuf> {
    let path = project_dir.join(MANIFEST_FILENAME);
    path.is_file().then_some(path)
}

/// 프로젝트 디렉토리 이름을 반환합니다.
pub fn project_name(project_dir: &Path) -> String {
    project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_dir.display().to_string())
}

/// 요청된 프로젝트 이름이 루트의 직계 디렉토리 하나만 가리킬 수 있는지 확인합니다.
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}

/// 크기 제한을 확인한 뒤 파일을 UTF-8로 읽습니다.
///
/// # Errors
///
/// - 크기 초과: `ProjectScannerError::FileTooBig`
/// - 메타데이터/읽기 실패, UTF-8 아님: `ProjectScannerError::Io`
pub fn read_bounded(path: &Path, max_file_size: usize) -> Result<String, ProjectScannerError> {
    let io_error = |source| ProjectScannerError::Io {
        path: path.display().to_string(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(io_error)?;
    let size = metadata.len();
    if usize::try_from(size).unwrap_or(usize::MAX) > max_file_size {
        return Err(ProjectScannerError::FileTooBig {
            path: path.display().to_string(),
            size,
            max: max_file_size,
        });
    }

    std::fs::read_to_string(path).map_err(io_error)
}
