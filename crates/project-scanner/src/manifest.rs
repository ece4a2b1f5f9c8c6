//! 프로젝트 매니페스트(pom.xml) 파서
//!
//! 흐름 문서와 같은 범용 트리 모델로 파싱한 뒤 필요한 필드만 읽습니다.
//! 누락된 필드는 에러가 아니며 `Unknown` 또는 `None`이 됩니다.

use std::path::Path;

use mulescope_flow_analyzer::{Mapping, TreeNode, parse_document};

use crate::error::ProjectScannerError;
use crate::types::{DependencyInfo, ProjectInfo};

/// 누락된 좌표 필드의 기본값
pub const UNKNOWN: &str = "Unknown";

/// 매니페스트 루트 요소
const PROJECT_ELEMENT: &str = "project";

/// 런타임 버전 속성
const APP_RUNTIME_PROPERTY: &str = "app.runtime";

/// Mule Maven 플러그인 버전 속성
const PLUGIN_VERSION_PROPERTY: &str = "mule.maven.plugin.version";

/// 파싱된 매니페스트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// groupId
    pub group_id: String,
    /// artifactId
    pub artifact_id: String,
    /// version
    pub version: String,
    /// packaging
    pub packaging: String,
    /// `app.runtime` 속성
    pub app_runtime: Option<String>,
    /// `mule.maven.plugin.version` 속성
    pub mule_maven_plugin_version: Option<String>,
    /// 좌표가 모두 있는 의존성
    pub dependencies: Vec<DependencyInfo>,
}

impl Manifest {
    /// 프로젝트 디렉토리 정보와 합쳐 [`ProjectInfo`]를 만듭니다.
    pub fn into_project_info(self, project_dir: &Path) -> ProjectInfo {
        ProjectInfo {
            project_name: crate::discovery::project_name(project_dir),
            project_path: project_dir.display().to_string(),
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.version,
            packaging: self.packaging,
            app_runtime: self.app_runtime,
            mule_maven_plugin_version: self.mule_maven_plugin_version,
            dependencies: self.dependencies,
        }
    }
}

/// pom.xml 내용을 파싱합니다.
///
/// # Errors
///
/// XML로 파싱할 수 없거나 `max_depth`를 넘게 중첩되면 `ProjectScannerError::ManifestParse`
pub fn parse_manifest(
    content: &str,
    source_path: &str,
    max_depth: usize,
) -> Result<Manifest, ProjectScannerError> {
    let document =
        parse_document(content, source_path, max_depth).map_err(|e| {
            ProjectScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            }
        })?;

    let empty = Mapping::new();
    let project = document
        .first(PROJECT_ELEMENT)
        .and_then(TreeNode::as_mapping)
        .unwrap_or(&empty);

    let coordinate = |key: &str| child_text(project, key).unwrap_or(UNKNOWN).to_owned();
    let property = |key: &str| {
        project
            .first("properties")
            .and_then(TreeNode::as_mapping)
            .and_then(|props| child_text(props, key))
            .map(str::to_owned)
    };

    Ok(Manifest {
        group_id: coordinate("groupId"),
        artifact_id: coordinate("artifactId"),
        version: coordinate("version"),
        packaging: coordinate("packaging"),
        app_runtime: property(APP_RUNTIME_PROPERTY),
        mule_maven_plugin_version: property(PLUGIN_VERSION_PROPERTY),
        dependencies: dependencies(project),
    })
}

/// `dependencies/dependency` 항목 중 groupId, artifactId, version이 모두 있는 것만 반환합니다.
fn dependencies(project: &Mapping) -> Vec<DependencyInfo> {
    let Some(section) = project.first("dependencies").and_then(TreeNode::as_mapping) else {
        return Vec::new();
    };

    section
        .nodes("dependency")
        .iter()
        .filter_map(TreeNode::as_mapping)
        .filter_map(|dep| {
            let field = |key: &str| child_text(dep, key).map(str::to_owned);
            Some(DependencyInfo {
                group_id: field("groupId")?,
                artifact_id: field("artifactId")?,
                version: field("version")?,
                classifier: field("classifier"),
                scope: field("scope"),
            })
        })
        .collect()
}

/// 직계 자식 요소의 비어 있지 않은 텍스트
fn child_text<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a str> {
    mapping
        .first(key)
        .and_then(TreeNode::text)
        .filter(|text| !text.is_empty())
}
