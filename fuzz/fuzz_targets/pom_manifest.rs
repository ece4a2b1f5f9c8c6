#![no_main]

use libfuzzer_sys::fuzz_target;
use mulescope_project_scanner::manifest::parse_manifest;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(manifest) = parse_manifest(content, "pom.xml", 64) {
        // 좌표가 하나라도 빠진 의존성은 남으면 안 된다
        for dep in &manifest.dependencies {
            assert!(!dep.group_id.is_empty());
            assert!(!dep.artifact_id.is_empty());
            assert!(!dep.version.is_empty());
        }
    }
});
