//! 프로젝트 스캐너 오케스트레이터
//!
//! [`ProjectScanner`]는 프로젝트 루트를 탐색하고, 각 프로젝트의 흐름 파일을
//! [`DocumentAnalyzer`]로 분석하여 리포트를 만듭니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! projects_dir --> list_projects --> JoinSet (spawn_blocking, 프로젝트당 1개)
//!                                          |
//!                                  FlowFileDetector --> read_bounded --> DocumentAnalyzer
//!                                          |
//!                                    ProjectFlows
//!                                          |
//!                                  FlowScanReport --> EndpointSummary
//!
//! projects_dir --> list_projects --> pom.xml --> parse_manifest --> DependencyScanReport
//! ```
//!
//! 파일 하나의 읽기/파싱 실패는 경고 로그를 남기고 건너뜁니다.
//! 다른 파일과 다른 프로젝트의 분석은 계속됩니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use mulescope_core::config::MulescopeConfig;
use mulescope_core::error::MulescopeError;
use mulescope_core::metrics as m;
use mulescope_flow_analyzer::tree::DEFAULT_MAX_DEPTH;
use mulescope_flow_analyzer::{DocumentAnalyzer, FlowAnalyzerConfig, FlowExtractor, FlowRecord};

use crate::config::ProjectScannerConfig;
use crate::discovery::{self, FlowFileDetector};
use crate::error::ProjectScannerError;
use crate::manifest::parse_manifest;
use crate::types::{DependencyScanReport, EndpointSummary, FlowScanReport, ProjectFlows, ProjectInfo};

/// 블로킹 태스크에서 공유하는 스캔 상태
struct ScanContext {
    detector: FlowFileDetector,
    analyzer: Arc<dyn DocumentAnalyzer>,
    max_file_size: usize,
    manifest_max_depth: usize,
}

impl ScanContext {
    /// 프로젝트 하나의 모든 흐름 파일을 분석합니다 (동기 I/O).
    fn scan_project(&self, project_dir: &Path) -> ProjectFlows {
        let flows: Vec<FlowRecord> = self
            .detector
            .flow_files(project_dir)
            .iter()
            .filter_map(|path| self.analyze_file(path))
            .flatten()
            .collect();

        let project = ProjectFlows::new(
            discovery::project_name(project_dir),
            project_dir.display().to_string(),
            flows,
        );

        debug!(
            project = %project.project_name,
            flows = project.total_flows,
            endpoints = project.total_endpoints,
            "project scanned"
        );
        project
    }

    fn analyze_file(&self, path: &Path) -> Option<Vec<FlowRecord>> {
        if !self.analyzer.can_analyze(path) {
            return None;
        }

        let source = path.display().to_string();
        let content = match discovery::read_bounded(path, self.max_file_size) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %source, error = %e, "failed to read flow file, skipping");
                metrics::counter!(m::ANALYZER_FILES_SKIPPED_TOTAL).increment(1);
                return None;
            }
        };

        match self.analyzer.analyze(&content, &source) {
            Ok(analysis) => {
                metrics::counter!(m::ANALYZER_FILES_ANALYZED_TOTAL).increment(1);
                metrics::counter!(m::ANALYZER_FLOWS_EXTRACTED_TOTAL)
                    .increment(analysis.flows.len() as u64);
                Some(analysis.flows)
            }
            Err(e) => {
                warn!(
                    path = %source,
                    analyzer = self.analyzer.name(),
                    error = %e,
                    "failed to parse flow file, skipping"
                );
                metrics::counter!(m::ANALYZER_FILES_SKIPPED_TOTAL).increment(1);
                None
            }
        }
    }

    /// 프로젝트 매니페스트를 읽습니다. 없거나 읽을 수 없으면 `None`입니다.
    fn read_manifest(&self, project_dir: &Path) -> Option<ProjectInfo> {
        let Some(path) = discovery::manifest_path(project_dir) else {
            debug!(project = %project_dir.display(), "no manifest, skipping");
            return None;
        };
        let source = path.display().to_string();

        let content = match discovery::read_bounded(&path, self.max_file_size) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %source, error = %e, "failed to read manifest, skipping");
                return None;
            }
        };

        match parse_manifest(&content, &source, self.manifest_max_depth) {
            Ok(manifest) => Some(manifest.into_project_info(project_dir)),
            Err(e) => {
                warn!(path = %source, error = %e, "failed to parse manifest, skipping");
                None
            }
        }
    }
}

/// 프로젝트 스캐너
///
/// 모든 스캔은 호출 시점의 디스크 상태를 읽으며, 결과를 캐시하지 않습니다.
pub struct ProjectScanner {
    config: ProjectScannerConfig,
    context: Arc<ScanContext>,
    scans_completed: Arc<AtomicU64>,
}

impl ProjectScanner {
    /// 전체 설정으로부터 스캐너를 생성합니다.
    ///
    /// 분석기 설정(`[analyzer]`)의 확장 분류표와 깊이 제한이 함께 적용됩니다.
    pub fn from_core_config(core: &MulescopeConfig) -> Result<Self, MulescopeError> {
        let analyzer_config = FlowAnalyzerConfig::from_core(&core.analyzer);
        let extractor = FlowExtractor::from_config(&analyzer_config)?;
        let max_depth = extractor.max_depth();

        let scanner = ProjectScannerBuilder::new()
            .config(ProjectScannerConfig::from_core(&core.scanner))
            .analyzer(Arc::new(extractor))
            .manifest_max_depth(max_depth)
            .build()?;
        Ok(scanner)
    }

    /// 스캐너 설정을 반환합니다.
    pub fn config(&self) -> &ProjectScannerConfig {
        &self.config
    }

    /// 완료된 스캔 수를 반환합니다.
    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    /// 모든 프로젝트의 흐름을 스캔합니다.
    ///
    /// 프로젝트마다 블로킹 태스크 하나를 띄워 동시에 분석합니다.
    /// 흐름이 없는 프로젝트는 리포트에서 빠지고, 결과는 프로젝트 이름 순입니다.
    pub async fn scan_flows(&self) -> Result<FlowScanReport, ProjectScannerError> {
        let started = Instant::now();
        let projects = self.list_projects().await?;
        metrics::gauge!(m::SCANNER_PROJECTS_DISCOVERED).set(projects.len() as f64);

        let mut tasks = JoinSet::new();
        for project_dir in projects {
            let context = Arc::clone(&self.context);
            tasks.spawn_blocking(move || context.scan_project(&project_dir));
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let project = joined
                .map_err(|e| ProjectScannerError::Task(format!("project scan task failed: {e}")))?;
            results.push(project);
        }

        let report =
            FlowScanReport::from_projects(results).with_scan_id(uuid::Uuid::new_v4().to_string());
        self.record_scan("flows", started);

        info!(
            scan_id = report.scan_id.as_deref().unwrap_or_default(),
            projects = report.total_projects,
            flows = report.total_flows,
            endpoints = report.total_endpoints,
            "flow scan completed"
        );
        Ok(report)
    }

    /// 프로젝트 하나의 흐름을 스캔합니다.
    ///
    /// 흐름이 없어도 빈 결과를 반환합니다.
    ///
    /// # Errors
    ///
    /// - 경로 구분자, `..`, 숨김 이름: `ProjectScannerError::InvalidProjectName`
    /// - 프로젝트 디렉토리가 없음: `ProjectScannerError::ProjectNotFound`
    pub async fn project_flows(&self, name: &str) -> Result<ProjectFlows, ProjectScannerError> {
        if !discovery::is_valid_project_name(name) {
            return Err(ProjectScannerError::InvalidProjectName(name.to_owned()));
        }

        let started = Instant::now();
        let project_dir = Path::new(&self.config.projects_dir).join(name);
        let context = Arc::clone(&self.context);
        let name = name.to_owned();

        let project = tokio::task::spawn_blocking(move || {
            if !project_dir.is_dir() {
                return Err(ProjectScannerError::ProjectNotFound(name));
            }
            Ok(context.scan_project(&project_dir))
        })
        .await
        .map_err(|e| ProjectScannerError::Task(format!("spawn_blocking failed: {e}")))??;

        self.record_scan("project", started);
        Ok(project)
    }

    /// 모든 프로젝트의 엔드포인트 요약을 만듭니다.
    pub async fn endpoints_summary(&self) -> Result<EndpointSummary, ProjectScannerError> {
        let report = self.scan_flows().await?;
        Ok(EndpointSummary::from_report(&report))
    }

    /// 모든 프로젝트의 매니페스트를 읽어 의존성 리포트를 만듭니다.
    ///
    /// 매니페스트가 없거나 파싱할 수 없는 프로젝트는 건너뜁니다.
    pub async fn scan_dependencies(&self) -> Result<DependencyScanReport, ProjectScannerError> {
        let started = Instant::now();
        let projects = self.list_projects().await?;
        let context = Arc::clone(&self.context);

        let infos = tokio::task::spawn_blocking(move || {
            projects
                .iter()
                .filter_map(|dir| context.read_manifest(dir))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| ProjectScannerError::Task(format!("spawn_blocking failed: {e}")))?;

        let report = DependencyScanReport::from_projects(infos);
        self.record_scan("dependencies", started);

        info!(projects = report.total_projects, "dependency scan completed");
        Ok(report)
    }

    async fn list_projects(&self) -> Result<Vec<PathBuf>, ProjectScannerError> {
        let root = PathBuf::from(&self.config.projects_dir);
        tokio::task::spawn_blocking(move || discovery::list_projects(&root))
            .await
            .map_err(|e| ProjectScannerError::Task(format!("spawn_blocking failed: {e}")))?
    }

    fn record_scan(&self, kind: &'static str, started: Instant) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(m::SCANNER_SCANS_COMPLETED_TOTAL, m::LABEL_SCAN_KIND => kind)
            .increment(1);
        metrics::histogram!(m::SCANNER_SCAN_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
    }
}

/// 프로젝트 스캐너 빌더
pub struct ProjectScannerBuilder {
    config: ProjectScannerConfig,
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    manifest_max_depth: usize,
}

impl ProjectScannerBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ProjectScannerConfig::default(),
            analyzer: None,
            manifest_max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// 스캐너 설정을 지정합니다.
    pub fn config(mut self, config: ProjectScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 흐름 문서 분석기를 지정합니다.
    ///
    /// 설정하지 않으면 내장 분류표를 쓰는 [`FlowExtractor`]를 사용합니다.
    pub fn analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// 매니페스트 파싱 시 허용 중첩 깊이를 지정합니다.
    pub fn manifest_max_depth(mut self, depth: usize) -> Self {
        self.manifest_max_depth = depth;
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `ProjectScannerError::Config`
    pub fn build(self) -> Result<ProjectScanner, ProjectScannerError> {
        self.config.validate()?;

        if self.manifest_max_depth == 0 {
            return Err(ProjectScannerError::Config {
                field: "manifest_max_depth".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        let analyzer = self
            .analyzer
            .unwrap_or_else(|| Arc::new(FlowExtractor::default()));

        let context = ScanContext {
            detector: FlowFileDetector::new(self.config.flow_locations.clone()),
            analyzer,
            max_file_size: self.config.max_file_size,
            manifest_max_depth: self.manifest_max_depth,
        };

        Ok(ProjectScanner {
            config: self.config,
            context: Arc::new(context),
            scans_completed: Arc::new(AtomicU64::new(0)),
        })
    }
}

impl Default for ProjectScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
