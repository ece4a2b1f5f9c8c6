//! Mulescope 흐름 구조 분석기
//!
//! Mule 흐름 XML 문서를 범용 트리로 만든 뒤, 흐름과 서브 흐름을 찾아
//! 엔드포인트, 프로세서 통계, 에러 핸들러, 흐름 참조를 추출합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`FlowAnalyzerError`)
//! - [`config`]: 분석기 설정 (`FlowAnalyzerConfig`, builder)
//! - [`tree`]: 범용 트리 모델 (`TreeNode`, `Mapping`, `Entry`, `parse_document`)
//! - [`registry`]: 프로세서 분류표 (`ProcessorRegistry`, `ExclusionRule`)
//! - [`walker`]: 재귀 구조 탐색기 (`StructuralWalker`)
//! - [`endpoint`]: 엔드포인트 추출 (이름 규칙, 명시적 요소)
//! - [`extractor`]: 흐름/서브 흐름 추출기 (`DocumentAnalyzer` trait, `FlowExtractor`)
//! - [`types`]: 결과 타입 (`FlowRecord`, `SubFlowRecord`, `EndpointRecord`)
//!
//! # Architecture
//!
//! ```text
//! XML text --> tree::parse_document --> Mapping
//!                                          |
//!                                    FlowExtractor
//!                                   /      |      \
//!                   endpoint::synthesize   |   StructuralWalker <-- Arc<ProcessorRegistry>
//!                                          |
//!                                  DocumentAnalysis
//! ```
//!
//! # 사용 예시
//!
//! ```
//! use mulescope_flow_analyzer::{DocumentAnalyzer, FlowExtractor};
//!
//! let xml = r#"<mule><flow name="get:\orders:cfg"><logger/></flow></mule>"#;
//! let analysis = FlowExtractor::default().analyze(xml, "orders.xml").unwrap();
//! assert_eq!(analysis.flows[0].endpoints[0].path.as_deref(), Some("/orders"));
//! assert_eq!(analysis.flows[0].processor_count, 1);
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod extractor;
pub mod registry;
pub mod tree;
pub mod types;
pub mod walker;

// --- Public API Re-exports ---

// Extractor
pub use extractor::{DocumentAnalyzer, FlowExtractor};

// Configuration
pub use config::{FlowAnalyzerConfig, FlowAnalyzerConfigBuilder};

// Error
pub use error::FlowAnalyzerError;

// Tree
pub use tree::{Entry, Mapping, TreeNode, parse_document};

// Registry
pub use registry::{ExclusionRule, ProcessorDescriptor, ProcessorRegistry};

// Walker
pub use walker::{ProcessorStats, StructuralWalker};

// Types
pub use types::{DocumentAnalysis, EndpointRecord, FlowRecord, SubFlowRecord};
