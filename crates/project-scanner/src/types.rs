//! 스캔 리포트 타입
//!
//! 모든 타입은 REST 응답과 CLI JSON 출력에 그대로 직렬화됩니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mulescope_flow_analyzer::{EndpointRecord, FlowRecord};

/// HTTP 엔드포인트 유형 이름
pub const ENDPOINT_TYPE_HTTP: &str = "HTTP";

/// 경로가 없는 엔드포인트 유형 이름
pub const ENDPOINT_TYPE_OTHER: &str = "Other";

/// 프로젝트 하나의 흐름 목록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFlows {
    /// 프로젝트 디렉토리 이름
    pub project_name: String,
    /// 프로젝트 디렉토리 경로
    pub project_path: String,
    /// 모든 흐름 파일에서 추출한 흐름
    pub flows: Vec<FlowRecord>,
    /// 흐름 수
    pub total_flows: usize,
    /// 엔드포인트 수
    pub total_endpoints: usize,
}

impl ProjectFlows {
    /// 흐름 목록으로부터 합계를 계산하여 생성합니다.
    pub fn new(
        project_name: impl Into<String>,
        project_path: impl Into<String>,
        flows: Vec<FlowRecord>,
    ) -> Self {
        let total_endpoints = flows.iter().map(|f| f.endpoints.len()).sum();
        Self {
            project_name: project_name.into(),
            project_path: project_path.into(),
            total_flows: flows.len(),
            total_endpoints,
            flows,
        }
    }

    /// 프로젝트의 모든 엔드포인트를 흐름 순서대로 반환합니다.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointRecord> {
        self.flows.iter().flat_map(|f| f.endpoints.iter())
    }
}

/// 전체 흐름 스캔 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowScanReport {
    /// 스캔 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
    /// 흐름이 하나 이상 있는 프로젝트 수
    pub total_projects: usize,
    /// 전체 흐름 수
    pub total_flows: usize,
    /// 전체 엔드포인트 수
    pub total_endpoints: usize,
    /// 프로젝트 이름 순 결과
    pub projects: Vec<ProjectFlows>,
}

impl FlowScanReport {
    /// 프로젝트 목록으로부터 합계를 계산하여 생성합니다.
    ///
    /// 흐름이 없는 프로젝트는 제외되고, 나머지는 이름 순으로 정렬됩니다.
    pub fn from_projects(mut projects: Vec<ProjectFlows>) -> Self {
        projects.retain(|p| p.total_flows > 0);
        projects.sort_by(|a, b| a.project_name.cmp(&b.project_name));

        Self {
            scan_id: None,
            total_projects: projects.len(),
            total_flows: projects.iter().map(|p| p.total_flows).sum(),
            total_endpoints: projects.iter().map(|p| p.total_endpoints).sum(),
            projects,
        }
    }

    /// 스캔 식별자를 붙입니다.
    pub fn with_scan_id(mut self, scan_id: impl Into<String>) -> Self {
        self.scan_id = Some(scan_id.into());
        self
    }
}

/// 프로젝트별 엔드포인트 묶음
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEndpoints {
    /// 엔드포인트 수
    pub count: usize,
    /// 엔드포인트 목록
    pub endpoints: Vec<EndpointRecord>,
}

/// 전체 엔드포인트 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    /// 전체 엔드포인트 수
    pub total_endpoints: usize,
    /// 프로젝트 이름 -> 엔드포인트 묶음
    pub endpoints_by_project: BTreeMap<String, ProjectEndpoints>,
    /// 유형(`HTTP` / `Other`) -> 개수
    pub endpoint_types: BTreeMap<String, usize>,
    /// 대문자 HTTP 메서드 -> 개수
    pub http_methods: BTreeMap<String, usize>,
}

impl EndpointSummary {
    /// 흐름 스캔 리포트에서 요약을 만듭니다.
    ///
    /// 경로가 있는 엔드포인트는 `HTTP`이며, 메서드가 있으면 대문자 메서드별로도 집계됩니다.
    /// 경로가 없으면 `Other`입니다.
    pub fn from_report(report: &FlowScanReport) -> Self {
        let mut summary = Self {
            total_endpoints: report.total_endpoints,
            ..Self::default()
        };

        for project in &report.projects {
            let endpoints: Vec<EndpointRecord> = project.endpoints().cloned().collect();

            for endpoint in &endpoints {
                let kind = if endpoint.is_http() {
                    if let Some(method) = endpoint.method.as_deref().filter(|m| !m.is_empty()) {
                        *summary
                            .http_methods
                            .entry(method.to_uppercase())
                            .or_insert(0) += 1;
                    }
                    ENDPOINT_TYPE_HTTP
                } else {
                    ENDPOINT_TYPE_OTHER
                };
                *summary.endpoint_types.entry(kind.to_owned()).or_insert(0) += 1;
            }

            summary.endpoints_by_project.insert(
                project.project_name.clone(),
                ProjectEndpoints {
                    count: endpoints.len(),
                    endpoints,
                },
            );
        }

        summary
    }
}

/// 매니페스트에 선언된 의존성
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    /// groupId
    pub group_id: String,
    /// artifactId
    pub artifact_id: String,
    /// version
    pub version: String,
    /// classifier (예: `mule-plugin`)
    pub classifier: Option<String>,
    /// scope (예: `test`)
    pub scope: Option<String>,
}

/// 매니페스트에서 읽은 프로젝트 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// 프로젝트 디렉토리 이름
    pub project_name: String,
    /// 프로젝트 디렉토리 경로
    pub project_path: String,
    /// groupId (없으면 `Unknown`)
    pub group_id: String,
    /// artifactId (없으면 `Unknown`)
    pub artifact_id: String,
    /// version (없으면 `Unknown`)
    pub version: String,
    /// packaging (없으면 `Unknown`)
    pub packaging: String,
    /// `app.runtime` 속성
    pub app_runtime: Option<String>,
    /// `mule.maven.plugin.version` 속성
    pub mule_maven_plugin_version: Option<String>,
    /// 유효한 의존성 목록 (선언 순서)
    pub dependencies: Vec<DependencyInfo>,
}

/// 전체 의존성 스캔 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyScanReport {
    /// 매니페스트를 읽은 프로젝트 수
    pub total_projects: usize,
    /// 프로젝트 이름 순 결과
    pub projects: Vec<ProjectInfo>,
}

impl DependencyScanReport {
    /// 프로젝트 목록을 이름 순으로 정렬하여 생성합니다.
    pub fn from_projects(mut projects: Vec<ProjectInfo>) -> Self {
        projects.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        Self {
            total_projects: projects.len(),
            projects,
        }
    }
}
