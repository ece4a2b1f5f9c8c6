#![no_main]

use libfuzzer_sys::fuzz_target;
use mulescope_flow_analyzer::{DocumentAnalyzer, FlowExtractor};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    // 깊이 제한을 낮춰 중첩 폭탄 입력도 빠르게 거부되어야 한다
    let extractor = FlowExtractor::default().with_max_depth(64);

    if let Ok(analysis) = extractor.analyze(content, "fuzz.xml") {
        for flow in &analysis.flows {
            assert_eq!(flow.processor_count, flow.processor_identifiers.len());
            assert_eq!(flow.sub_flows.len(), analysis.sub_flows.len());
        }
    }
});
