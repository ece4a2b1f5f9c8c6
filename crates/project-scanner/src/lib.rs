//! Mulescope 프로젝트 스캐너
//!
//! 프로젝트 루트 디렉토리를 탐색하여 각 Mule 프로젝트의 흐름 파일과
//! 매니페스트(pom.xml)를 분석하고 리포트를 만듭니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`ProjectScannerError`)
//! - [`config`]: 스캐너 설정 (`ProjectScannerConfig`, builder)
//! - [`discovery`]: 프로젝트/흐름 파일 탐색 (`FlowFileDetector`)
//! - [`manifest`]: pom.xml 파서
//! - [`scanner`]: 스캔 오케스트레이터 (`ProjectScanner`, builder)
//! - [`types`]: 리포트 타입 (`FlowScanReport`, `EndpointSummary`, `DependencyScanReport`)
//!
//! # Architecture
//!
//! ```text
//! projects_dir/
//!   <project>/pom.xml ---------> manifest::parse_manifest --> ProjectInfo
//!   <project>/src/main/*/*.xml -> FlowExtractor (flow-analyzer) --> FlowRecord
//!                                        |
//!                                  ProjectScanner
//!                                   /    |     \
//!                   FlowScanReport  EndpointSummary  DependencyScanReport
//! ```
//!
//! # 사용 예시
//!
//! ```no_run
//! use mulescope_project_scanner::{ProjectScannerBuilder, ProjectScannerConfigBuilder};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProjectScannerConfigBuilder::new()
//!     .projects_dir("/srv/mule")
//!     .build()?;
//! let scanner = ProjectScannerBuilder::new().config(config).build()?;
//!
//! let report = scanner.scan_flows().await?;
//! println!("{} flows in {} projects", report.total_flows, report.total_projects);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod scanner;
pub mod types;

// --- Public API Re-exports ---

// Scanner
pub use scanner::{ProjectScanner, ProjectScannerBuilder};

// Configuration
pub use config::{ProjectScannerConfig, ProjectScannerConfigBuilder};

// Error
pub use error::ProjectScannerError;

// Discovery
pub use discovery::FlowFileDetector;

// Types
pub use types::{
    DependencyInfo, DependencyScanReport, EndpointSummary, FlowScanReport, ProjectEndpoints,
    ProjectFlows, ProjectInfo,
};
