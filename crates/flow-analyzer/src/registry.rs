//! 프로세서 분류표
//!
//! [`ProcessorRegistry`]는 처리 단계 태그 식별자를 표시 이름과 카테고리로 매핑하고,
//! 문맥에 따라 처리 단계로 세지 않는 [`ExclusionRule`] 목록을 가집니다.
//!
//! 분류표는 생성 후 변경되지 않으며 `Arc`로 공유됩니다.
//! 구조 요소(`when`, `otherwise`, `error-handler`, `ee:message`, `ee:set-payload`,
//! `ee:variables`, `ee:set-variable`)는 등록되지 않습니다.
//!
//! # 분류표 확장
//!
//! TOML 파일로 프로세서와 제외 규칙을 추가할 수 있습니다.
//!
//! ```toml
//! [[processor]]
//! identifier = "custom:step"
//! display_name = "Custom Step"
//! category = "Custom"
//!
//! [[exclusion]]
//! tag = "custom:inner"
//! parent = "custom:step"
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::FlowAnalyzerError;
use crate::tree::is_element_key;

/// 미등록 식별자의 카테고리
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// 기본 프로세서 목록: (식별자, 표시 이름, 카테고리)
const BUILTIN_PROCESSORS: &[(&str, &str, &str)] = &[
    // HTTP & API
    ("http:listener", "HTTP Listener", "HTTP"),
    ("http:request", "HTTP Request", "HTTP"),
    ("http:response", "HTTP Response", "HTTP"),
    ("api-gateway:listener", "API Gateway Listener", "API Gateway"),
    ("api-gateway:request", "API Gateway Request", "API Gateway"),
    ("apikit:router", "APIkit Router", "APIkit"),
    ("apikit:console", "APIkit Console", "APIkit"),
    ("websocket:listener", "WebSocket Listener", "WebSocket"),
    ("websocket:send", "WebSocket Send", "WebSocket"),
    // Data Manipulation
    ("set-payload", "Set Payload", "Data Manipulation"),
    ("set-variable", "Set Variable", "Data Manipulation"),
    ("set-session-variable", "Set Session Variable", "Data Manipulation"),
    ("remove-variable", "Remove Variable", "Data Manipulation"),
    ("remove-session-variable", "Remove Session Variable", "Data Manipulation"),
    ("message-enricher", "Message Enricher", "Data Manipulation"),
    ("ee:transform", "DataWeave Transform", "Data Manipulation"),
    ("transform", "Transform", "Data Manipulation"),
    // Flow Control
    ("flow", "Flow", "Flow Control"),
    ("sub-flow", "Sub-flow", "Flow Control"),
    ("flow-ref", "Flow Reference", "Flow Control"),
    ("choice", "Choice Router", "Flow Control"),
    ("foreach", "For Each", "Flow Control"),
    ("filter", "Filter", "Flow Control"),
    ("scatter-gather", "Scatter-Gather", "Flow Control"),
    ("until-successful", "Until Successful", "Flow Control"),
    ("poll", "Poll", "Flow Control"),
    ("scheduler", "Scheduler", "Flow Control"),
    ("quartz:inbound-endpoint", "Quartz Inbound Endpoint", "Flow Control"),
    // Error Handling
    ("raise-error", "Raise Error", "Error Handling"),
    ("on-error-continue", "On Error Continue", "Error Handling"),
    ("on-error-propagate", "On Error Propagate", "Error Handling"),
    ("circuit-breaker", "Circuit Breaker", "Error Handling"),
    // Database
    ("db:select", "Database Select", "Database"),
    ("db:insert", "Database Insert", "Database"),
    ("db:update", "Database Update", "Database"),
    ("db:delete", "Database Delete", "Database"),
    ("mongodb:find", "MongoDB Find", "Database"),
    ("mongodb:insert", "MongoDB Insert", "Database"),
    ("mongodb:update", "MongoDB Update", "Database"),
    ("mongodb:delete", "MongoDB Delete", "Database"),
    // File Operations
    ("file:read", "File Read", "File Operations"),
    ("file:write", "File Write", "File Operations"),
    ("file:list", "File List", "File Operations"),
    ("file:delete", "File Delete", "File Operations"),
    ("file:create-directory", "File Create Directory", "File Operations"),
    ("file:move", "File Move", "File Operations"),
    ("file:copy", "File Copy", "File Operations"),
    ("file:append", "File Append", "File Operations"),
    ("ftp:read", "FTP Read", "File Operations"),
    ("ftp:write", "FTP Write", "File Operations"),
    ("sftp:read", "SFTP Read", "File Operations"),
    ("sftp:write", "SFTP Write", "File Operations"),
    // Cloud Services
    ("aws:s3-get-object", "AWS S3 Get Object", "Cloud Services"),
    ("aws:s3-list-objects", "AWS S3 List Objects", "Cloud Services"),
    ("aws:s3-put-object", "AWS S3 Put Object", "Cloud Services"),
    ("salesforce:query", "Salesforce Query", "Cloud Services"),
    ("salesforce:create", "Salesforce Create", "Cloud Services"),
    ("salesforce:update", "Salesforce Update", "Cloud Services"),
    ("salesforce:delete", "Salesforce Delete", "Cloud Services"),
    (
        "google-sheets:create-spreadsheet",
        "Google Sheets Create Spreadsheet",
        "Cloud Services",
    ),
    (
        "google-sheets:read-spreadsheet",
        "Google Sheets Read Spreadsheet",
        "Cloud Services",
    ),
    (
        "google-sheets:append-spreadsheet-row",
        "Google Sheets Append Spreadsheet Row",
        "Cloud Services",
    ),
    // Messaging
    ("jms:publish", "JMS Publish", "Messaging"),
    ("jms:subscribe", "JMS Consume (Subscribe)", "Messaging"),
    ("amqp:publish", "AMQP Publish", "Messaging"),
    ("amqp:subscribe", "AMQP Subscribe", "Messaging"),
    ("rabbitmq:basic-publish", "RabbitMQ Publish", "Messaging"),
    ("rabbitmq:basic-consume", "RabbitMQ Consume", "Messaging"),
    ("mqtt:publish", "MQTT Publish", "Messaging"),
    ("mqtt:subscribe", "MQTT Subscribe", "Messaging"),
    // Batch Processing
    ("batch:job", "Batch Job", "Batch Processing"),
    ("batch:step", "Batch Step", "Batch Processing"),
    ("batch:input", "Batch Input", "Batch Processing"),
    ("batch:record", "Batch Record", "Batch Processing"),
    ("batch:commit", "Batch Commit", "Batch Processing"),
    ("batch:on-complete", "Batch On Complete", "Batch Processing"),
    // Validation
    ("validation:is-not-null", "Validate Is Not Null", "Validation"),
    ("validation:is-equal", "Validate Is Equal", "Validation"),
    ("validation:is-true", "Validate Is True", "Validation"),
    ("validation:is-false", "Validate Is False", "Validation"),
    // Security
    ("secure:encrypt", "Secure Encrypt", "Security"),
    ("secure:decrypt", "Secure Decrypt", "Security"),
    ("secure:hash", "Secure Hash", "Security"),
    // Communication
    ("tcp:listener", "TCP Listener", "Communication"),
    ("tcp:send", "TCP Send", "Communication"),
    ("udp:listen", "UDP Listen", "Communication"),
    ("udp:send", "UDP Send", "Communication"),
    ("ws:consumer", "Web Service Consumer", "Communication"),
    ("smtp:send-email", "Send Email (SMTP)", "Communication"),
    // Data Format
    ("xml:validate", "XML Validate", "Data Format"),
    ("xml:transform", "XML Transform", "Data Format"),
    ("csv:read", "CSV Read", "Data Format"),
    ("csv:write", "CSV Write", "Data Format"),
    ("excel:read", "Excel Read", "Data Format"),
    ("excel:write", "Excel Write", "Data Format"),
    ("mime:multipart-assembler", "Multipart Assembler", "Data Format"),
    ("mime:multipart-disassembler", "Multipart Disassembler", "Data Format"),
    ("stream:splitter", "Stream Splitter", "Data Format"),
    ("stream:assembler", "Stream Assembler", "Data Format"),
    // Directory Services
    ("ldap:search", "LDAP Search", "Directory Services"),
    ("ldap:create-entry", "LDAP Create Entry", "Directory Services"),
    ("ldap:modify-entry", "LDAP Modify Entry", "Directory Services"),
    ("ldap:delete-entry", "LDAP Delete Entry", "Directory Services"),
    // Social Media
    ("twitter:search-tweets", "Twitter Search Tweets", "Social Media"),
    ("twitter:post-tweet", "Twitter Post Tweet", "Social Media"),
    ("slack:send-message", "Slack Send Message", "Social Media"),
    // Caching
    ("cache:retrieve", "Cache Retrieve", "Caching"),
    ("cache:evict-by-key", "Cache Evict By Key", "Caching"),
    ("cache:update", "Cache Update", "Caching"),
    ("cache:invalidate-cache", "Invalidate Cache", "Caching"),
    // Utility & Monitoring
    ("logger", "Logger", "Utility"),
    ("scripting:execute-script", "Execute Script", "Utility"),
    ("metrics:report", "Metrics Report", "Monitoring"),
];

/// 기본 제외 규칙: (태그, 직계 부모 태그)
///
/// `http:listener` 안의 `http:response`는 응답 설정이지 처리 단계가 아닙니다.
const BUILTIN_EXCLUSIONS: &[(&str, &str)] = &[("http:response", "http:listener")];

/// 프로세서 설명
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorDescriptor {
    /// 태그 식별자 (예: `ee:transform`)
    pub identifier: String,
    /// 표시 이름
    pub display_name: String,
    /// 카테고리
    pub category: String,
}

/// 문맥 제외 규칙
///
/// `tag`는 직계 부모 키가 `parent`일 때만 처리 단계로 세지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// 제외 대상 태그
    pub tag: String,
    /// 제외가 적용되는 직계 부모 태그
    pub parent: String,
}

/// 분류표 확장 파일 구조 (파싱용)
#[derive(Deserialize)]
struct ProcessorTableFile {
    #[serde(default)]
    processor: Vec<ProcessorDescriptor>,
    #[serde(default)]
    exclusion: Vec<ExclusionRule>,
}

/// 프로세서 분류표
#[derive(Debug, Clone)]
pub struct ProcessorRegistry {
    processors: HashMap<String, ProcessorDescriptor>,
    exclusions: Vec<ExclusionRule>,
}

impl ProcessorRegistry {
    /// 빈 분류표를 생성합니다.
    pub fn empty() -> Self {
        Self {
            processors: HashMap::new(),
            exclusions: Vec::new(),
        }
    }

    /// 기본 프로세서와 제외 규칙으로 분류표를 생성합니다.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (identifier, display_name, category) in BUILTIN_PROCESSORS {
            registry.insert(ProcessorDescriptor {
                identifier: (*identifier).to_owned(),
                display_name: (*display_name).to_owned(),
                category: (*category).to_owned(),
            });
        }
        for (tag, parent) in BUILTIN_EXCLUSIONS {
            registry.exclusions.push(ExclusionRule {
                tag: (*tag).to_owned(),
                parent: (*parent).to_owned(),
            });
        }
        registry
    }

    /// 프로세서를 추가한 분류표를 반환합니다.
    pub fn with_processor(
        mut self,
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.insert(ProcessorDescriptor {
            identifier: identifier.into(),
            display_name: display_name.into(),
            category: category.into(),
        });
        self
    }

    /// 제외 규칙을 추가한 분류표를 반환합니다.
    pub fn with_exclusion(mut self, tag: impl Into<String>, parent: impl Into<String>) -> Self {
        self.push_exclusion(ExclusionRule {
            tag: tag.into(),
            parent: parent.into(),
        });
        self
    }

    /// TOML 분류표를 병합합니다. 같은 식별자는 덮어씁니다.
    ///
    /// 검증에 실패하면 분류표는 변경되지 않습니다.
    ///
    /// # Arguments
    ///
    /// - `content`: TOML 문자열
    /// - `source_path`: 원본 파일 경로 (에러 메시지용)
    pub fn extend_from_toml(
        &mut self,
        content: &str,
        source_path: &str,
    ) -> Result<(), FlowAnalyzerError> {
        let mut table: ProcessorTableFile = toml::from_str(content).map_err(|e| {
            FlowAnalyzerError::Registry(format!("{source_path}: invalid TOML: {e}"))
        })?;
        table.trim_fields();

        for descriptor in &table.processor {
            validate_descriptor(descriptor, source_path)?;
        }
        for rule in &table.exclusion {
            validate_exclusion(rule, source_path)?;
        }

        tracing::debug!(
            source = source_path,
            processors = table.processor.len(),
            exclusions = table.exclusion.len(),
            "merged processor table"
        );

        for descriptor in table.processor {
            self.insert(descriptor);
        }
        for rule in table.exclusion {
            self.push_exclusion(rule);
        }
        Ok(())
    }

    /// 식별자를 분류합니다. 미등록 식별자는 `Unknown` 카테고리로 degrade 됩니다.
    pub fn classify(&self, identifier: &str) -> ProcessorDescriptor {
        match self.processors.get(identifier) {
            Some(descriptor) => descriptor.clone(),
            None => {
                let display_name = if identifier.is_empty() {
                    UNKNOWN_CATEGORY
                } else {
                    identifier
                };
                ProcessorDescriptor {
                    identifier: identifier.to_owned(),
                    display_name: display_name.to_owned(),
                    category: UNKNOWN_CATEGORY.to_owned(),
                }
            }
        }
    }

    /// 등록된 식별자인지 확인합니다.
    pub fn is_processor(&self, identifier: &str) -> bool {
        self.processors.contains_key(identifier)
    }

    /// `(key, parent_key)` 조합이 제외 규칙에 해당하는지 확인합니다.
    pub fn is_excluded(&self, key: &str, parent_key: Option<&str>) -> bool {
        let Some(parent) = parent_key else {
            return false;
        };
        self.exclusions
            .iter()
            .any(|rule| rule.tag == key && rule.parent == parent)
    }

    /// 제외 규칙 목록
    pub fn exclusions(&self) -> &[ExclusionRule] {
        &self.exclusions
    }

    /// 카테고리별 식별자 목록 (카테고리, 식별자 모두 정렬)
    pub fn by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for descriptor in self.processors.values() {
            categories
                .entry(descriptor.category.clone())
                .or_default()
                .push(descriptor.identifier.clone());
        }
        for identifiers in categories.values_mut() {
            identifiers.sort();
        }
        categories
    }

    /// 모든 프로세서 설명 (카테고리, 식별자 순 정렬)
    pub fn descriptors(&self) -> Vec<&ProcessorDescriptor> {
        let mut descriptors: Vec<_> = self.processors.values().collect();
        descriptors.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        descriptors
    }

    /// 등록된 프로세서 수
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    fn insert(&mut self, descriptor: ProcessorDescriptor) {
        self.processors
            .insert(descriptor.identifier.clone(), descriptor);
    }

    fn push_exclusion(&mut self, rule: ExclusionRule) {
        if !self.exclusions.contains(&rule) {
            self.exclusions.push(rule);
        }
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProcessorTableFile {
    /// 태그 비교는 정확히 일치해야 하므로 앞뒤 공백을 제거해 둡니다.
    fn trim_fields(&mut self) {
        for descriptor in &mut self.processor {
            trim_in_place(&mut descriptor.identifier);
            trim_in_place(&mut descriptor.display_name);
            trim_in_place(&mut descriptor.category);
        }
        for rule in &mut self.exclusion {
            trim_in_place(&mut rule.tag);
            trim_in_place(&mut rule.parent);
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}

fn validate_descriptor(
    descriptor: &ProcessorDescriptor,
    source_path: &str,
) -> Result<(), FlowAnalyzerError> {
    let id = descriptor.identifier.as_str();
    if id.is_empty() {
        return Err(FlowAnalyzerError::Registry(format!(
            "{source_path}: processor identifier must not be empty"
        )));
    }
    if !is_element_key(id) {
        return Err(FlowAnalyzerError::Registry(format!(
            "{source_path}: '{id}' is not an element name"
        )));
    }
    if descriptor.display_name.is_empty() || descriptor.category.is_empty() {
        return Err(FlowAnalyzerError::Registry(format!(
            "{source_path}: processor '{id}' needs display_name and category"
        )));
    }
    Ok(())
}

fn validate_exclusion(rule: &ExclusionRule, source_path: &str) -> Result<(), FlowAnalyzerError> {
    if rule.tag.is_empty() || rule.parent.is_empty() {
        return Err(FlowAnalyzerError::Registry(format!(
            "{source_path}: exclusion needs both tag and parent"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_known_processors() {
        let registry = ProcessorRegistry::builtin();
        assert_eq!(registry.len(), BUILTIN_PROCESSORS.len());
        for id in ["logger", "choice", "flow-ref", "ee:transform", "http:response"] {
            assert!(registry.is_processor(id), "{id} should be registered");
        }
    }

    #[test]
    fn structural_elements_are_not_registered() {
        let registry = ProcessorRegistry::builtin();
        for id in [
            "when",
            "otherwise",
            "error-handler",
            "ee:message",
            "ee:set-payload",
            "ee:variables",
            "ee:set-variable",
        ] {
            assert!(!registry.is_processor(id), "{id} must not be a processor");
        }
    }

    #[test]
    fn builtin_identifiers_are_unique() {
        let mut ids: Vec<_> = BUILTIN_PROCESSORS.iter().map(|(id, _, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BUILTIN_PROCESSORS.len());
    }

    #[test]
    fn classify_known_identifier() {
        let registry = ProcessorRegistry::builtin();
        let descriptor = registry.classify("ee:transform");
        assert_eq!(descriptor.display_name, "DataWeave Transform");
        assert_eq!(descriptor.category, "Data Manipulation");
    }

    #[test]
    fn classify_unknown_identifier_degrades() {
        let registry = ProcessorRegistry::builtin();
        let descriptor = registry.classify("acme:widget");
        assert_eq!(descriptor.identifier, "acme:widget");
        assert_eq!(descriptor.display_name, "acme:widget");
        assert_eq!(descriptor.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn classify_empty_identifier_has_non_empty_names() {
        let descriptor = ProcessorRegistry::empty().classify("");
        assert!(!descriptor.display_name.is_empty());
        assert!(!descriptor.category.is_empty());
    }

    #[test]
    fn http_response_is_excluded_only_under_listener() {
        let registry = ProcessorRegistry::builtin();
        assert!(registry.is_excluded("http:response", Some("http:listener")));
        assert!(!registry.is_excluded("http:response", Some("flow")));
        assert!(!registry.is_excluded("http:response", None));
        assert_eq!(registry.exclusions().len(), 1);
    }

    #[test]
    fn builder_methods_add_entries() {
        let registry = ProcessorRegistry::empty()
            .with_processor("custom:step", "Custom Step", "Custom")
            .with_exclusion("custom:inner", "custom:step")
            .with_exclusion("custom:inner", "custom:step");
        assert!(registry.is_processor("custom:step"));
        assert!(registry.is_excluded("custom:inner", Some("custom:step")));
        // 중복 제외 규칙은 한 번만 저장
        assert_eq!(registry.exclusions().len(), 1);
    }

    #[test]
    fn extend_from_toml_merges_entries() {
        let mut registry = ProcessorRegistry::builtin();
        let toml = r#"
[[processor]]
identifier = "custom:step"
display_name = "Custom Step"
category = "Custom"

[[processor]]
identifier = "logger"
display_name = "Audit Logger"
category = "Utility"

[[exclusion]]
tag = "custom:inner"
parent = "custom:step"
"#;
        registry.extend_from_toml(toml, "extra.toml").unwrap();
        assert!(registry.is_processor("custom:step"));
        assert_eq!(registry.classify("logger").display_name, "Audit Logger");
        assert!(registry.is_excluded("custom:inner", Some("custom:step")));
        assert_eq!(registry.len(), BUILTIN_PROCESSORS.len() + 1);
    }

    #[test]
    fn extend_from_toml_trims_surrounding_whitespace() {
        let mut registry = ProcessorRegistry::empty();
        let toml = r#"
[[processor]]
identifier = " custom:step "
display_name = " Custom Step"
category = "Custom "

[[exclusion]]
tag = " custom:inner"
parent = "custom:step "
"#;
        registry.extend_from_toml(toml, "padded.toml").unwrap();
        assert!(registry.is_processor("custom:step"));
        assert!(!registry.is_processor(" custom:step "));
        assert_eq!(registry.classify("custom:step").display_name, "Custom Step");
        assert!(registry.by_category().contains_key("Custom"));
        assert!(registry.is_excluded("custom:inner", Some("custom:step")));
    }

    #[test]
    fn extend_from_toml_rejects_blank_identifier() {
        let mut registry = ProcessorRegistry::empty();
        let toml = r#"
[[processor]]
identifier = "   "
display_name = "Blank"
category = "Custom"
"#;
        let err = registry.extend_from_toml(toml, "blank.toml").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert!(registry.is_empty());
    }

    #[test]
    fn extend_from_toml_rejects_invalid_toml() {
        let mut registry = ProcessorRegistry::builtin();
        let err = registry
            .extend_from_toml("[[processor]\n", "bad.toml")
            .unwrap_err();
        assert!(matches!(err, FlowAnalyzerError::Registry(_)));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn extend_from_toml_rejects_attribute_identifier_without_partial_merge() {
        let mut registry = ProcessorRegistry::builtin();
        let toml = r#"
[[processor]]
identifier = "ok:step"
display_name = "Ok"
category = "Custom"

[[processor]]
identifier = "@name"
display_name = "Attr"
category = "Custom"
"#;
        let err = registry.extend_from_toml(toml, "attr.toml").unwrap_err();
        assert!(err.to_string().contains("@name"));
        assert!(!registry.is_processor("ok:step"));
    }

    #[test]
    fn extend_from_toml_rejects_incomplete_exclusion() {
        let mut registry = ProcessorRegistry::builtin();
        let toml = r#"
[[exclusion]]
tag = "x"
parent = ""
"#;
        assert!(registry.extend_from_toml(toml, "ex.toml").is_err());
    }

    #[test]
    fn by_category_groups_and_sorts() {
        let categories = ProcessorRegistry::builtin().by_category();
        let http = categories.get("HTTP").unwrap();
        assert_eq!(http, &vec!["http:listener", "http:request", "http:response"]);
        assert!(categories.contains_key("Flow Control"));
        assert!(!categories.contains_key(UNKNOWN_CATEGORY));
    }

    #[test]
    fn descriptors_are_sorted_by_category_then_identifier() {
        let registry = ProcessorRegistry::builtin();
        let descriptors = registry.descriptors();
        for pair in descriptors.windows(2) {
            let ordered = (&pair[0].category, &pair[0].identifier)
                <= (&pair[1].category, &pair[1].identifier);
            assert!(ordered);
        }
    }
}
