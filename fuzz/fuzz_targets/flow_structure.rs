#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use mulescope_flow_analyzer::{DocumentAnalyzer, FlowExtractor};

/// 퍼저용 구조적 입력: 항상 올바른 XML로 직렬화된다
#[derive(Arbitrary, Debug)]
struct FuzzDocument {
    /// false면 `mule` 루트 없이 첫 흐름 하나만 문서 루트가 된다
    wrap_in_mule: bool,
    flows: Vec<FuzzFlow>,
    sub_flows: Vec<FuzzFlow>,
}

#[derive(Arbitrary, Debug)]
struct FuzzFlow {
    name: Option<String>,
    children: Vec<FuzzElement>,
}

#[derive(Arbitrary, Debug)]
enum FuzzElement {
    Logger,
    FlowRef(String),
    Listener { path: String, response: bool },
    Request { method: String, path: String },
    Choice(Vec<FuzzElement>),
    ErrorHandler(Option<String>),
    Custom(u8),
}

/// 중첩 폭탄을 막기 위한 직렬화 깊이 상한
const MAX_NESTING: usize = 8;

fn escape(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '&' => "&amp;".to_owned(),
            '<' => "&lt;".to_owned(),
            '>' => "&gt;".to_owned(),
            '"' => "&quot;".to_owned(),
            '\'' => "&apos;".to_owned(),
            other => other.to_string(),
        })
        .collect()
}

fn write_element(out: &mut String, element: &FuzzElement, depth: usize) {
    match element {
        FuzzElement::Logger => out.push_str("<logger/>"),
        FuzzElement::FlowRef(name) => {
            out.push_str(&format!(r#"<flow-ref name="{}"/>"#, escape(name)));
        }
        FuzzElement::Listener { path, response } => {
            out.push_str(&format!(r#"<http:listener path="{}">"#, escape(path)));
            if *response {
                out.push_str("<http:response/>");
            }
            out.push_str("</http:listener>");
        }
        FuzzElement::Request { method, path } => out.push_str(&format!(
            r#"<http:request method="{}" path="{}"/>"#,
            escape(method),
            escape(path)
        )),
        FuzzElement::Choice(branches) => {
            out.push_str("<choice><when>");
            if depth < MAX_NESTING {
                for branch in branches {
                    write_element(out, branch, depth + 1);
                }
            }
            out.push_str("</when></choice>");
        }
        FuzzElement::ErrorHandler(name) => match name {
            Some(name) => out.push_str(&format!(
                r#"<error-handler name="{}"><logger/></error-handler>"#,
                escape(name)
            )),
            None => out.push_str("<error-handler/>"),
        },
        FuzzElement::Custom(n) => out.push_str(&format!("<custom:op{n}/>")),
    }
}

fn write_flow(out: &mut String, tag: &str, flow: &FuzzFlow) {
    match &flow.name {
        Some(name) => out.push_str(&format!(r#"<{tag} name="{}">"#, escape(name))),
        None => out.push_str(&format!("<{tag}>")),
    }
    for child in &flow.children {
        write_element(out, child, 0);
    }
    out.push_str(&format!("</{tag}>"));
}

fuzz_target!(|input: FuzzDocument| {
    let mut xml = String::new();
    let (expected_flows, expected_sub_flows) = if input.wrap_in_mule {
        xml.push_str("<mule>");
        for flow in &input.flows {
            write_flow(&mut xml, "flow", flow);
        }
        for sub_flow in &input.sub_flows {
            write_flow(&mut xml, "sub-flow", sub_flow);
        }
        xml.push_str("</mule>");
        (input.flows.len(), input.sub_flows.len())
    } else {
        let Some(flow) = input.flows.first() else {
            return;
        };
        write_flow(&mut xml, "flow", flow);
        (1, 0)
    };

    let analysis = FlowExtractor::default()
        .analyze(&xml, "structured.xml")
        .expect("serialized document must be well-formed");

    assert_eq!(analysis.flows.len(), expected_flows);
    assert_eq!(analysis.sub_flows.len(), expected_sub_flows);
    for flow in &analysis.flows {
        assert_eq!(flow.processor_count, flow.processor_identifiers.len());
        assert_eq!(flow.sub_flows, analysis.sub_flows);
    }
});
