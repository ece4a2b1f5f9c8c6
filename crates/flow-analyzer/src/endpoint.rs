//! 엔드포인트 추출
//!
//! 흐름 하나에서 두 가지 독립적인 출처로 엔드포인트를 만듭니다.
//!
//! 1. 흐름 이름 규칙: `method:path[:...]` (예: `get:\orders:api-config`)
//! 2. 흐름의 직계 자식 중 리스너/요청 형태의 요소
//!
//! 이름 기반 결과가 있으면 항상 첫 번째입니다.

use crate::tree::{Mapping, TreeNode};
use crate::types::EndpointRecord;

/// 이름 규칙에서 허용하는 HTTP 메서드
pub const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// 엔드포인트로 취급하는 직계 자식 태그 (검사 순서)
pub const ENDPOINT_TAGS: [&str; 5] = [
    "http:listener",
    "api-gateway:listener",
    "http:request",
    "api-gateway:request",
    "listener",
];

/// 흐름의 엔드포인트를 추출합니다.
///
/// 이름 규칙 결과(있다면)가 먼저, 그 다음 명시적 요소가 태그 순서 및 문서 순서로 옵니다.
pub fn synthesize(flow: &Mapping, flow_name: &str) -> Vec<EndpointRecord> {
    let mut endpoints: Vec<EndpointRecord> = from_flow_name(flow_name).into_iter().collect();
    endpoints.extend(from_elements(flow));
    endpoints
}

/// 흐름 이름 규칙으로 엔드포인트를 추론합니다.
///
/// `:`로 나눈 첫 부분이 메서드, 두 번째 부분이 경로입니다. 세 번째 이후는 버립니다.
/// 메서드가 [`HTTP_METHODS`]에 없거나 부분이 둘 미만이면 `None`입니다.
pub fn from_flow_name(flow_name: &str) -> Option<EndpointRecord> {
    let mut parts = flow_name.split(':');
    let verb = parts.next()?.trim().to_uppercase();
    let raw_path = parts.next()?.trim();

    if !HTTP_METHODS.contains(&verb.as_str()) {
        return None;
    }

    let normalized = raw_path.replace('\\', "/");
    let path = if normalized.starts_with('/') {
        normalized
    } else {
        format!("/{normalized}")
    };

    let verb_lower = verb.to_lowercase();
    let slug = slugify(&path);
    let name = if slug.is_empty() {
        verb_lower
    } else {
        format!("{verb_lower}-{slug}")
    };

    Some(EndpointRecord {
        name: Some(name.clone()),
        path: Some(path),
        method: Some(verb),
        doc_id: Some(name),
        config_ref: None,
        raw_config: None,
    })
}

/// 직계 자식의 리스너/요청 요소로 엔드포인트를 만듭니다.
pub fn from_elements(flow: &Mapping) -> Vec<EndpointRecord> {
    ENDPOINT_TAGS
        .iter()
        .flat_map(|tag| flow.nodes(tag))
        .map(endpoint_from_node)
        .collect()
}

fn endpoint_from_node(node: &TreeNode) -> EndpointRecord {
    let attr = |name: &str| node.attr(name).map(str::to_owned);
    EndpointRecord {
        name: attr("name"),
        path: attr("path"),
        method: attr("method"),
        doc_id: attr("doc:name"),
        config_ref: attr("config-ref"),
        raw_config: Some(node.clone()),
    }
}

/// 경로의 비어 있지 않은 세그먼트에서 괄호를 지우고 `-`로 잇습니다.
fn slugify(path: &str) -> String {
    path.split('/')
        .map(|segment| segment.replace(['(', ')'], ""))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
