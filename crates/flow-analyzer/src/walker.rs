//! 재귀 구조 탐색기
//!
//! [`StructuralWalker`]는 서브트리를 깊이 우선 전위 순회하며 각 요소 키를
//! "프로세서", "문맥 제외", "무시" 중 하나로 분류합니다.
//!
//! 분류 결과와 관계없이 항상 자식으로 내려갑니다. 예를 들어 `choice` 안의
//! `when` 안의 `logger`는 `choice`와 `logger` 모두로 집계됩니다.
//!
//! 순수 함수이므로 여러 스레드에서 동시에 사용해도 안전합니다.

use serde::Serialize;

use crate::registry::ProcessorRegistry;
use crate::tree::{Entry, TreeNode, is_element_key};

/// 프로세서 집계 결과
///
/// `count`는 항상 `identifiers.len()`과 같습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// 프로세서 수
    pub count: usize,
    /// 발견 순서대로의 프로세서 식별자 (중복 허용)
    pub identifiers: Vec<String>,
}

impl ProcessorStats {
    fn from_identifiers(identifiers: Vec<String>) -> Self {
        Self {
            count: identifiers.len(),
            identifiers,
        }
    }
}

/// 재귀 구조 탐색기
pub struct StructuralWalker<'a> {
    registry: &'a ProcessorRegistry,
}

impl<'a> StructuralWalker<'a> {
    /// 분류표를 참조하는 탐색기를 생성합니다.
    pub fn new(registry: &'a ProcessorRegistry) -> Self {
        Self { registry }
    }

    /// 노드 하나를 탐색합니다.
    ///
    /// `parent_key`는 이 노드를 담고 있는 키입니다. 흐름 노드처럼 최상위에서
    /// 시작할 때는 `None`을 넘깁니다.
    pub fn walk(&self, node: &TreeNode, parent_key: Option<&str>) -> ProcessorStats {
        let mut identifiers = Vec::new();
        self.visit(node, parent_key, &mut identifiers);
        ProcessorStats::from_identifiers(identifiers)
    }

    /// 시퀀스를 포함한 매핑 항목을 탐색합니다. 모든 원소가 같은 부모 키를 공유합니다.
    pub fn walk_entry(&self, entry: &Entry, parent_key: Option<&str>) -> ProcessorStats {
        let mut identifiers = Vec::new();
        for node in entry.nodes() {
            self.visit(node, parent_key, &mut identifiers);
        }
        ProcessorStats::from_identifiers(identifiers)
    }

    fn visit(&self, node: &TreeNode, parent_key: Option<&str>, out: &mut Vec<String>) {
        let TreeNode::Mapping(mapping) = node else {
            return;
        };

        for (key, entry) in mapping.iter() {
            if !is_element_key(key) {
                continue;
            }

            if self.registry.is_excluded(key, parent_key) {
                tracing::trace!(key, parent = parent_key, "excluded by context");
            } else if self.registry.is_processor(key) {
                out.push(key.to_owned());
            }

            for child in entry.nodes() {
                self.visit(child, Some(key), out);
            }
        }
    }
}
