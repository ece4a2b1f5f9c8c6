//! 분석 결과 도메인 타입
//!
//! JSON 직렬화 시 필드명은 REST 응답 형식(`file_path`, `processors_count`,
//! `processors_found`, `listener_config` 등)을 따릅니다.

use serde::Serialize;

use crate::tree::TreeNode;

/// 엔드포인트 레코드
///
/// 모든 필드는 선택적이며, 값이 없다는 것 자체가 의미를 가집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointRecord {
    /// 엔드포인트 이름
    pub name: Option<String>,
    /// 경로 (예: `/orders`)
    pub path: Option<String>,
    /// HTTP 메서드
    pub method: Option<String>,
    /// 문서 식별자 (`doc:name`)
    pub doc_id: Option<String>,
    /// 참조하는 설정 이름 (`config-ref`)
    pub config_ref: Option<String>,
    /// 엔드포인트 요소 원본
    #[serde(rename = "listener_config")]
    pub raw_config: Option<TreeNode>,
}

impl EndpointRecord {
    /// 비어 있지 않은 경로가 있으면 HTTP 엔드포인트로 봅니다.
    pub fn is_http(&self) -> bool {
        self.path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// 서브 흐름 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubFlowRecord {
    /// 서브 흐름 이름
    pub name: String,
    /// 프로세서 수
    #[serde(rename = "processors_count")]
    pub processor_count: usize,
    /// 발견 순서대로의 프로세서 식별자
    #[serde(rename = "processors_found")]
    pub processor_identifiers: Vec<String>,
}

/// 흐름 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowRecord {
    /// 흐름 이름 (없으면 파일 이름)
    pub name: String,
    /// 흐름이 정의된 파일
    #[serde(rename = "file_path")]
    pub source_file: String,
    /// 엔드포인트 목록 (이름 기반 추론 결과가 먼저)
    pub endpoints: Vec<EndpointRecord>,
    /// 프로세서 수
    #[serde(rename = "processors_count")]
    pub processor_count: usize,
    /// 발견 순서대로의 프로세서 식별자
    #[serde(rename = "processors_found")]
    pub processor_identifiers: Vec<String>,
    /// 이름이 있는 에러 핸들러
    pub error_handlers: Vec<String>,
    /// 참조하는 다른 흐름 이름 (`flow-ref`)
    pub flow_refs: Vec<String>,
    /// 같은 문서에 정의된 서브 흐름
    pub sub_flows: Vec<SubFlowRecord>,
}

/// 문서 하나의 분석 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentAnalysis {
    /// 원본 파일 식별자
    pub source: String,
    /// 흐름 레코드
    pub flows: Vec<FlowRecord>,
    /// 문서 범위 서브 흐름
    pub sub_flows: Vec<SubFlowRecord>,
}

impl DocumentAnalysis {
    /// 모든 흐름의 엔드포인트 수 합계
    pub fn endpoint_count(&self) -> usize {
        self.flows.iter().map(|f| f.endpoints.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_serializes_with_listener_config_key() {
        let endpoint = EndpointRecord {
            path: Some("/orders".to_owned()),
            raw_config: Some(TreeNode::Scalar("x".to_owned())),
            ..Default::default()
        };
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["path"], "/orders");
        assert_eq!(json["listener_config"], "x");
        assert!(json["name"].is_null());
    }

    #[test]
    fn flow_record_uses_response_field_names() {
        let flow = FlowRecord {
            name: "f".to_owned(),
            source_file: "a.xml".to_owned(),
            endpoints: vec![],
            processor_count: 1,
            processor_identifiers: vec!["logger".to_owned()],
            error_handlers: vec![],
            flow_refs: vec![],
            sub_flows: vec![],
        };
        let json = serde_json::to_value(&flow).unwrap();
        assert_eq!(json["file_path"], "a.xml");
        assert_eq!(json["processors_count"], 1);
        assert_eq!(json["processors_found"][0], "logger");
    }

    #[test]
    fn http_classification_depends_on_path() {
        let mut endpoint = EndpointRecord::default();
        assert!(!endpoint.is_http());
        endpoint.path = Some("/".to_owned());
        assert!(endpoint.is_http());
    }
}
