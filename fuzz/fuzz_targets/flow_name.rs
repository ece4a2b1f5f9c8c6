#![no_main]

use libfuzzer_sys::fuzz_target;
use mulescope_flow_analyzer::endpoint::{HTTP_METHODS, from_flow_name};

fuzz_target!(|name: &str| {
    let Some(endpoint) = from_flow_name(name) else {
        return;
    };

    let method = endpoint.method.as_deref().unwrap_or_default();
    let path = endpoint.path.as_deref().unwrap_or_default();

    assert!(HTTP_METHODS.contains(&method));
    assert!(path.starts_with('/'));
    assert!(!path.contains('\\'));
    assert_eq!(endpoint.name, endpoint.doc_id);
});
