//! 흐름/서브 흐름 추출기
//!
//! [`DocumentAnalyzer`] trait은 문서 하나를 분석하는 인터페이스이고,
//! [`FlowExtractor`]는 Mule 흐름 XML용 구현입니다.
//!
//! # 처리 순서
//!
//! ```text
//! XML text --> parse_document --> Mapping
//!                                    |
//!                   +----------------+----------------+
//!                   |                                 |
//!             flow 노드마다                      sub-flow 노드마다
//!   synthesize + StructuralWalker           StructuralWalker
//!                   |                                 |
//!              FlowRecord  <---- sub_flows 첨부 ---- SubFlowRecord
//! ```
//!
//! 흐름과 서브 흐름은 `mule` 루트 바로 아래에서 찾고, `mule` 루트가 없으면
//! 문서 최상위에서 찾습니다.

use std::path::Path;
use std::sync::Arc;

use crate::config::FlowAnalyzerConfig;
use crate::endpoint;
use crate::error::FlowAnalyzerError;
use crate::registry::ProcessorRegistry;
use crate::tree::{DEFAULT_MAX_DEPTH, Mapping, TreeNode, parse_document};
use crate::types::{DocumentAnalysis, FlowRecord, SubFlowRecord};
use crate::walker::StructuralWalker;

/// 흐름 정의를 감싸는 루트 요소
pub const ROOT_ELEMENT: &str = "mule";

/// 흐름 태그
pub const FLOW_TAG: &str = "flow";

/// 서브 흐름 태그
pub const SUB_FLOW_TAG: &str = "sub-flow";

/// 이름 없는 서브 흐름의 기본 이름
pub const UNKNOWN_SUB_FLOW: &str = "Unknown Sub-Flow";

/// 문서 분석기 trait
///
/// 원본 텍스트와 식별자를 받아 문서 단위 결과를 만듭니다.
/// 부분 결과는 없습니다. 문서 전체가 성공하거나 실패합니다.
pub trait DocumentAnalyzer: Send + Sync {
    /// 분석기 이름
    fn name(&self) -> &str;

    /// 주어진 경로의 파일을 이 분석기가 처리할 수 있는지 확인합니다.
    fn can_analyze(&self, path: &Path) -> bool;

    /// 문서를 분석합니다.
    ///
    /// # Arguments
    ///
    /// - `content`: 파일 내용 (UTF-8 문자열)
    /// - `source_path`: 원본 파일 경로 (레코드와 에러 메시지에 사용)
    fn analyze(
        &self,
        content: &str,
        source_path: &str,
    ) -> Result<DocumentAnalysis, FlowAnalyzerError>;
}

/// Mule 흐름 추출기
#[derive(Debug, Clone)]
pub struct FlowExtractor {
    registry: Arc<ProcessorRegistry>,
    max_depth: usize,
}

impl FlowExtractor {
    /// 분류표를 공유하는 추출기를 생성합니다.
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// 설정으로부터 추출기를 생성합니다. 확장 분류표가 있으면 함께 로드합니다.
    pub fn from_config(config: &FlowAnalyzerConfig) -> Result<Self, FlowAnalyzerError> {
        config.validate()?;
        let registry = config.load_registry()?;
        Ok(Self::new(Arc::new(registry)).with_max_depth(config.max_depth))
    }

    /// 허용 중첩 깊이를 지정합니다.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 공유 중인 분류표
    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }

    /// 허용 중첩 깊이
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// 문서의 모든 흐름 레코드를 추출합니다.
    ///
    /// 흐름마다 레코드 하나가 생기며, 문서의 서브 흐름 목록 전체가 각 레코드에 붙습니다.
    pub fn extract_flows(&self, document: &Mapping, source_file: &str) -> Vec<FlowRecord> {
        let sub_flows = self.extract_sub_flows(document);
        self.flow_records(document, source_file, &sub_flows)
    }

    /// 문서의 서브 흐름 레코드를 추출합니다.
    pub fn extract_sub_flows(&self, document: &Mapping) -> Vec<SubFlowRecord> {
        let walker = StructuralWalker::new(&self.registry);
        top_level_nodes(document, SUB_FLOW_TAG)
            .iter()
            .map(|node| {
                let stats = walker.walk(node, None);
                SubFlowRecord {
                    name: node.attr("name").unwrap_or(UNKNOWN_SUB_FLOW).to_owned(),
                    processor_count: stats.count,
                    processor_identifiers: stats.identifiers,
                }
            })
            .collect()
    }

    /// 이미 추출한 서브 흐름 목록을 붙여 흐름 레코드를 만듭니다.
    fn flow_records(
        &self,
        document: &Mapping,
        source_file: &str,
        sub_flows: &[SubFlowRecord],
    ) -> Vec<FlowRecord> {
        top_level_nodes(document, FLOW_TAG)
            .iter()
            .map(|node| self.flow_record(node, source_file, sub_flows))
            .collect()
    }

    fn flow_record(
        &self,
        node: &TreeNode,
        source_file: &str,
        sub_flows: &[SubFlowRecord],
    ) -> FlowRecord {
        let empty = Mapping::new();
        let flow = node.as_mapping().unwrap_or(&empty);
        let name = match flow.attr("name") {
            Some(name) => name.to_owned(),
            None => base_name(source_file),
        };

        let stats = StructuralWalker::new(&self.registry).walk(node, None);

        FlowRecord {
            endpoints: endpoint::synthesize(flow, &name),
            processor_count: stats.count,
            processor_identifiers: stats.identifiers,
            error_handlers: child_names(flow, "error-handler"),
            flow_refs: child_names(flow, "flow-ref"),
            sub_flows: sub_flows.to_vec(),
            source_file: source_file.to_owned(),
            name,
        }
    }
}

impl Default for FlowExtractor {
    fn default() -> Self {
        Self::new(Arc::new(ProcessorRegistry::builtin()))
    }
}

impl DocumentAnalyzer for FlowExtractor {
    fn name(&self) -> &str {
        "mule-flow"
    }

    fn can_analyze(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
    }

    fn analyze(
        &self,
        content: &str,
        source_path: &str,
    ) -> Result<DocumentAnalysis, FlowAnalyzerError> {
        let document = parse_document(content, source_path, self.max_depth)?;
        let sub_flows = self.extract_sub_flows(&document);
        let flows = self.flow_records(&document, source_path, &sub_flows);

        tracing::debug!(
            source = source_path,
            flows = flows.len(),
            sub_flows = sub_flows.len(),
            "analyzed flow document"
        );

        Ok(DocumentAnalysis {
            source: source_path.to_owned(),
            flows,
            sub_flows,
        })
    }
}

/// 흐름이 놓인 매핑에서 `tag` 노드를 찾습니다.
///
/// `mule` 루트가 있으면 그 안, 없으면 문서 최상위를 봅니다.
/// `mule` 루트가 텍스트뿐이면 빈 슬라이스입니다.
fn top_level_nodes<'a>(document: &'a Mapping, tag: &str) -> &'a [TreeNode] {
    match document.first(ROOT_ELEMENT) {
        Some(root) => root.as_mapping().map(|m| m.nodes(tag)).unwrap_or(&[]),
        None => document.nodes(tag),
    }
}

/// 직계 자식 중 `name` 속성이 있는 요소의 이름 목록
fn child_names(flow: &Mapping, tag: &str) -> Vec<String> {
    flow.nodes(tag)
        .iter()
        .filter_map(|node| node.attr("name"))
        .map(str::to_owned)
        .collect()
}

fn base_name(source_file: &str) -> String {
    Path::new(source_file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source_file)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns:http="http://www.mulesoft.org/schema/mule/http">
    <flow name="get:\orders:api-config">
        <logger message="start"/>
        <flow-ref name="load-orders"/>
        <flow-ref/>
        <error-handler name="orders-errors">
            <on-error-propagate type="ANY"><logger/></on-error-propagate>
        </error-handler>
        <error-handler/>
    </flow>
    <flow name="orders-listener">
        <http:listener path="/orders" config-ref="httpConfig"/>
        <flow-ref name="load-orders"/>
    </flow>
    <sub-flow name="load-orders">
        <db:select/>
        <ee:transform><ee:message/></ee:transform>
    </sub-flow>
    <sub-flow>
        <logger/>
    </sub-flow>
</mule>"#;

    fn analyze(xml: &str, source: &str) -> DocumentAnalysis {
        FlowExtractor::default().analyze(xml, source).unwrap()
    }

    #[test]
    fn extracts_one_record_per_flow() {
        let analysis = analyze(ORDERS_XML, "src/main/mule/orders.xml");
        assert_eq!(analysis.flows.len(), 2);
        assert_eq!(analysis.flows[0].name, "get:\\orders:api-config");
        assert_eq!(analysis.flows[1].name, "orders-listener");
        for flow in &analysis.flows {
            assert_eq!(flow.source_file, "src/main/mule/orders.xml");
            assert_eq!(flow.sub_flows, analysis.sub_flows);
        }
    }

    #[test]
    fn error_handlers_and_flow_refs_need_names() {
        let analysis = analyze(ORDERS_XML, "orders.xml");
        let flow = &analysis.flows[0];
        assert_eq!(flow.error_handlers, vec!["orders-errors"]);
        assert_eq!(flow.flow_refs, vec!["load-orders"]);
    }

    #[test]
    fn processors_are_counted_per_flow() {
        let analysis = analyze(ORDERS_XML, "orders.xml");
        let flow = &analysis.flows[0];
        assert_eq!(
            flow.processor_identifiers,
            vec!["logger", "flow-ref", "on-error-propagate", "logger"]
        );
        assert_eq!(flow.processor_count, 4);
    }

    #[test]
    fn sub_flows_have_fallback_names() {
        let analysis = analyze(ORDERS_XML, "orders.xml");
        assert_eq!(analysis.sub_flows.len(), 2);
        assert_eq!(analysis.sub_flows[0].name, "load-orders");
        assert_eq!(
            analysis.sub_flows[0].processor_identifiers,
            vec!["db:select", "ee:transform"]
        );
        assert_eq!(analysis.sub_flows[1].name, UNKNOWN_SUB_FLOW);
        assert_eq!(analysis.sub_flows[1].processor_count, 1);
    }

    #[test]
    fn endpoints_combine_name_and_listener() {
        let analysis = analyze(ORDERS_XML, "orders.xml");
        let first = &analysis.flows[0].endpoints;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name.as_deref(), Some("get-orders"));

        let second = &analysis.flows[1].endpoints;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].config_ref.as_deref(), Some("httpConfig"));
        assert_eq!(analysis.endpoint_count(), 2);
    }

    #[test]
    fn unnamed_flow_falls_back_to_file_name() {
        let analysis = analyze("<mule><flow><logger/></flow></mule>", "/tmp/app/main.xml");
        assert_eq!(analysis.flows[0].name, "main.xml");
    }

    #[test]
    fn flows_without_mule_root_are_found_at_top_level() {
        let analysis = analyze(r#"<flow name="bare"><logger/></flow>"#, "bare.xml");
        assert_eq!(analysis.flows.len(), 1);
        assert_eq!(analysis.flows[0].name, "bare");
    }

    #[test]
    fn sub_flow_without_mule_root_is_found_at_top_level() {
        let analysis = analyze(
            r#"<sub-flow name="bare-sub"><logger/><flow-ref name="x"/></sub-flow>"#,
            "bare-sub.xml",
        );
        assert!(analysis.flows.is_empty());
        assert_eq!(analysis.sub_flows.len(), 1);
        assert_eq!(analysis.sub_flows[0].name, "bare-sub");
        assert_eq!(
            analysis.sub_flows[0].processor_identifiers,
            vec!["logger", "flow-ref"]
        );
    }

    #[test]
    fn flow_records_attach_given_sub_flows() {
        let extractor = FlowExtractor::default();
        let document = parse_document(ORDERS_XML, "orders.xml", DEFAULT_MAX_DEPTH).unwrap();
        let sub_flows = vec![SubFlowRecord {
            name: "precomputed".to_owned(),
            processor_count: 0,
            processor_identifiers: Vec::new(),
        }];

        let flows = extractor.flow_records(&document, "orders.xml", &sub_flows);
        assert_eq!(flows.len(), 2);
        for flow in &flows {
            assert_eq!(flow.sub_flows, sub_flows);
        }
        assert_eq!(
            extractor.extract_flows(&document, "orders.xml")[0].sub_flows,
            extractor.extract_sub_flows(&document)
        );
    }

    #[test]
    fn nested_flows_are_not_extracted() {
        let analysis = analyze(
            r#"<mule><wrapper><flow name="hidden"/></wrapper></mule>"#,
            "nested.xml",
        );
        assert!(analysis.flows.is_empty());
    }

    #[test]
    fn document_without_flows_is_empty_not_error() {
        let analysis = analyze("<mule><http:listener-config name=\"c\"/></mule>", "cfg.xml");
        assert!(analysis.flows.is_empty());
        assert!(analysis.sub_flows.is_empty());
    }

    #[test]
    fn text_only_mule_root_yields_nothing() {
        let analysis = analyze("<mule>text</mule>", "text.xml");
        assert!(analysis.flows.is_empty());
    }

    #[test]
    fn malformed_document_fails_whole_analysis() {
        let err = FlowExtractor::default()
            .analyze("<mule><flow name=\"x\">", "broken.xml")
            .unwrap_err();
        assert!(err.is_document_error());
    }

    #[test]
    fn depth_limit_is_applied() {
        let extractor = FlowExtractor::default().with_max_depth(2);
        let err = extractor
            .analyze("<mule><flow><logger/></flow></mule>", "deep.xml")
            .unwrap_err();
        assert!(matches!(err, FlowAnalyzerError::TooDeep { .. }));
    }

    #[test]
    fn can_analyze_xml_only() {
        let extractor = FlowExtractor::default();
        assert!(extractor.can_analyze(Path::new("src/main/mule/api.xml")));
        assert!(extractor.can_analyze(Path::new("API.XML")));
        assert!(!extractor.can_analyze(Path::new("pom.json")));
        assert!(!extractor.can_analyze(Path::new("README")));
    }

    #[test]
    fn custom_registry_changes_classification() {
        let registry = ProcessorRegistry::empty().with_processor("custom:step", "Custom", "Custom");
        let extractor = FlowExtractor::new(Arc::new(registry));
        let analysis = extractor
            .analyze(
                r#"<mule><flow name="f"><custom:step/><logger/></flow></mule>"#,
                "c.xml",
            )
            .unwrap();
        assert_eq!(analysis.flows[0].processor_identifiers, vec!["custom:step"]);
    }
}
