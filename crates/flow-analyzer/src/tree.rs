//! 범용 트리 모델 -- XML 문서를 중첩 매핑/시퀀스 트리로 표현
//!
//! XML 요소 하나는 다음 규칙으로 [`TreeNode`]가 됩니다.
//!
//! - 속성은 `@` 접두어 키로 저장 (`<flow name="x">` -> `@name`)
//! - 속성이나 자식이 있는 요소의 텍스트는 `#text` 키로 저장
//! - 텍스트만 있는 요소는 [`TreeNode::Scalar`]
//! - 같은 이름의 형제 요소는 첫 등장 위치에서 [`Entry::Sequence`]로 묶임
//! - 속성도 자식도 텍스트도 없는 요소는 빈 [`Mapping`]
//!
//! 문서 전체는 루트 요소 이름 하나를 키로 갖는 [`Mapping`]입니다.
//! 트리는 생성 후 변경되지 않습니다.
//!
//! # 예시
//!
//! ```
//! use mulescope_flow_analyzer::tree::parse_document;
//!
//! let xml = r#"<mule><flow name="a"><logger/></flow></mule>"#;
//! let doc = parse_document(xml, "a.xml", 64).unwrap();
//! let mule = doc.first("mule").and_then(|n| n.as_mapping()).unwrap();
//! let flow = mule.first("flow").unwrap();
//! assert_eq!(flow.attr("name"), Some("a"));
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::FlowAnalyzerError;

/// 속성 키 접두어
pub const ATTR_PREFIX: char = '@';

/// 혼합 콘텐츠 텍스트 키
pub const TEXT_KEY: &str = "#text";

/// 기본 최대 중첩 깊이
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// 트리 노드
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// 텍스트 또는 속성 값
    Scalar(String),
    /// 순서가 보존된 키 -> 자식 매핑
    Mapping(Mapping),
}

impl TreeNode {
    /// 매핑이면 참조를 반환합니다.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            Self::Scalar(_) => None,
        }
    }

    /// 스칼라이면 문자열을 반환합니다.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Mapping(_) => None,
        }
    }

    /// 속성 값을 조회합니다. 스칼라 노드에는 속성이 없습니다.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_mapping().and_then(|m| m.attr(name))
    }

    /// 요소의 텍스트 내용을 반환합니다.
    ///
    /// 스칼라는 그 자체, 매핑은 `#text` 항목을 봅니다.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Mapping(m) => m.first(TEXT_KEY).and_then(TreeNode::as_scalar),
        }
    }
}

/// 매핑 값: 단일 노드 또는 같은 키의 형제 노드 시퀀스
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// 형제가 하나뿐인 노드
    Single(TreeNode),
    /// 같은 키를 가진 형제 노드들 (문서 순서)
    Sequence(Vec<TreeNode>),
}

impl Entry {
    /// 단일 노드도 길이 1 시퀀스로 취급하여 반환합니다.
    pub fn nodes(&self) -> &[TreeNode] {
        match self {
            Self::Single(node) => std::slice::from_ref(node),
            Self::Sequence(nodes) => nodes,
        }
    }
}

/// 순서가 보존된 키 -> [`Entry`] 매핑
///
/// 키 조회는 `index`를 거치므로 서로 다른 자식 태그가 아주 많아도
/// 삽입과 조회가 상수 시간입니다.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Entry)>,
    index: HashMap<String, usize>,
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        // index는 entries에서 파생되므로 비교하지 않음
        self.entries == other.entries
    }
}

impl Eq for Mapping {}

impl Mapping {
    /// 빈 매핑을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 노드를 추가합니다. 이미 있는 키면 시퀀스로 승격됩니다.
    pub(crate) fn push(&mut self, key: String, node: TreeNode) {
        if let Some(&position) = self.index.get(&key) {
            let entry = &mut self.entries[position].1;
            let previous = std::mem::replace(entry, Entry::Sequence(Vec::new()));
            *entry = match previous {
                Entry::Single(first) => Entry::Sequence(vec![first, node]),
                Entry::Sequence(mut nodes) => {
                    nodes.push(node);
                    Entry::Sequence(nodes)
                }
            };
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, Entry::Single(node)));
    }

    /// 키로 항목을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index
            .get(key)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, entry)| entry)
    }

    /// 키에 해당하는 모든 노드를 반환합니다. 없으면 빈 슬라이스입니다.
    pub fn nodes(&self, key: &str) -> &[TreeNode] {
        self.get(key).map(Entry::nodes).unwrap_or(&[])
    }

    /// 키에 해당하는 첫 노드를 반환합니다.
    pub fn first(&self, key: &str) -> Option<&TreeNode> {
        self.nodes(key).first()
    }

    /// 키 존재 여부
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `@name` 형식의 속성 값을 조회합니다.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.first(&format!("{ATTR_PREFIX}{name}"))
            .and_then(TreeNode::as_scalar)
    }

    /// 원래 순서대로 (키, 항목)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// 키 개수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, TreeNode)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, TreeNode)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, node) in iter {
            mapping.push(key, node);
        }
        mapping
    }
}

/// 요소 키인지 확인합니다. `@name` 같은 속성 키와 `#text`는 제외됩니다.
pub fn is_element_key(key: &str) -> bool {
    !key.starts_with(ATTR_PREFIX) && key != TEXT_KEY
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::Mapping(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(node) => node.serialize(serializer),
            Self::Sequence(nodes) => nodes.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// 열린 요소 하나의 구성 상태
struct Frame {
    name: String,
    mapping: Mapping,
    text: String,
}

impl Frame {
    fn finish(self) -> (String, TreeNode) {
        let Frame {
            name,
            mut mapping,
            text,
        } = self;

        let node = if text.is_empty() {
            TreeNode::Mapping(mapping)
        } else if mapping.is_empty() {
            TreeNode::Scalar(text)
        } else {
            mapping.push(TEXT_KEY.to_owned(), TreeNode::Scalar(text));
            TreeNode::Mapping(mapping)
        };
        (name, node)
    }
}

/// XML 텍스트를 파싱하여 문서 트리를 만듭니다.
///
/// 반환값은 루트 요소 이름 하나를 키로 가진 [`Mapping`]입니다.
///
/// # Errors
///
/// - 잘못된 XML, 닫히지 않은 요소, 루트가 없거나 여러 개인 문서:
///   [`FlowAnalyzerError::MalformedDocument`]
/// - `max_depth`를 넘는 중첩: [`FlowAnalyzerError::TooDeep`]
pub fn parse_document(
    content: &str,
    source: &str,
    max_depth: usize,
) -> Result<Mapping, FlowAnalyzerError> {
    let malformed = |reason: String| FlowAnalyzerError::MalformedDocument {
        path: source.to_owned(),
        reason,
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut document = Mapping::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(malformed(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
        };

        match event {
            Event::Start(start) => {
                if stack.len() >= max_depth {
                    return Err(FlowAnalyzerError::TooDeep {
                        path: source.to_owned(),
                        max_depth,
                    });
                }
                let (name, mapping) = open_element(&start).map_err(malformed)?;
                stack.push(Frame {
                    name,
                    mapping,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                if stack.len() >= max_depth {
                    return Err(FlowAnalyzerError::TooDeep {
                        path: source.to_owned(),
                        max_depth,
                    });
                }
                let (name, mapping) = open_element(&start).map_err(malformed)?;
                attach(&mut stack, &mut document, name, TreeNode::Mapping(mapping))
                    .map_err(malformed)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag".to_owned()))?;
                let (name, node) = frame.finish();
                attach(&mut stack, &mut document, name, node).map_err(malformed)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| malformed(format!("invalid text: {e}")))?;
                append_text(&mut stack, &text).map_err(malformed)?;
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let text = String::from_utf8_lossy(&raw);
                append_text(&mut stack, &text).map_err(malformed)?;
            }
            Event::Eof => break,
            // 선언, 주석, 처리 명령, DOCTYPE은 트리에 포함하지 않음
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!(
            "unexpected end of document: <{}> is not closed",
            open.name
        )));
    }

    if document.is_empty() {
        return Err(malformed("document has no root element".to_owned()));
    }

    Ok(document)
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, Mapping), String> {
    let name = utf8(start.name().as_ref())?.into_owned();
    let mut mapping = Mapping::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute on <{name}>: {e}"))?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| format!("invalid attribute value on <{name}>: {e}"))?;
        mapping.push(
            format!("{ATTR_PREFIX}{key}"),
            TreeNode::Scalar(value.into_owned()),
        );
    }

    Ok((name, mapping))
}

fn attach(
    stack: &mut [Frame],
    document: &mut Mapping,
    name: String,
    node: TreeNode,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.mapping.push(name, node);
            Ok(())
        }
        None if document.is_empty() => {
            document.push(name, node);
            Ok(())
        }
        None => Err(format!("multiple root elements: <{name}>")),
    }
}

fn append_text(stack: &mut [Frame], text: &str) -> Result<(), String> {
    if text.is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None => Err("text outside of root element".to_owned()),
    }
}

fn utf8(bytes: &[u8]) -> Result<Cow<'_, str>, String> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| format!("invalid utf-8 name: {e}"))
}
