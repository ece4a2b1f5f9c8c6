//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `mulescope_`
//! - 모듈명: `analyzer_`, `scanner_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(mulescope_core::metrics::ANALYZER_FILES_ANALYZED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 스캔 종류 레이블 키 (flows, endpoints, dependencies)
pub const LABEL_SCAN_KIND: &str = "kind";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Flow Analyzer 메트릭 ──────────────────────────────────────────

/// Analyzer: 분석에 성공한 XML 파일 수 (counter)
pub const ANALYZER_FILES_ANALYZED_TOTAL: &str = "mulescope_analyzer_files_analyzed_total";

/// Analyzer: 파싱 실패 또는 읽기 실패로 건너뛴 파일 수 (counter)
pub const ANALYZER_FILES_SKIPPED_TOTAL: &str = "mulescope_analyzer_files_skipped_total";

/// Analyzer: 추출된 흐름 수 (counter)
pub const ANALYZER_FLOWS_EXTRACTED_TOTAL: &str = "mulescope_analyzer_flows_extracted_total";

// ─── Project Scanner 메트릭 ────────────────────────────────────────

/// Scanner: 완료된 스캔 수 (counter, label: kind)
pub const SCANNER_SCANS_COMPLETED_TOTAL: &str = "mulescope_scanner_scans_completed_total";

/// Scanner: 스캔 소요 시간 (histogram, 초)
pub const SCANNER_SCAN_DURATION_SECONDS: &str = "mulescope_scanner_scan_duration_seconds";

/// Scanner: 마지막 스캔에서 발견한 프로젝트 수 (gauge)
pub const SCANNER_PROJECTS_DISCOVERED: &str = "mulescope_scanner_projects_discovered";

// ─── Daemon 메트릭 ──────────────────────────────────────────────────

/// Daemon: 처리한 HTTP 요청 수 (counter, label: result)
pub const DAEMON_REQUESTS_TOTAL: &str = "mulescope_daemon_requests_total";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "mulescope_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 스캔 소요 시간 히스토그램 버킷 (초)
///
/// 1ms ~ 60s 범위 (디스크 I/O 포함)
pub const SCAN_DURATION_BUCKETS: [f64; 9] = [0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 60.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `mulescope-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Flow Analyzer
    describe_counter!(
        ANALYZER_FILES_ANALYZED_TOTAL,
        "Total number of flow XML files successfully analyzed"
    );
    describe_counter!(
        ANALYZER_FILES_SKIPPED_TOTAL,
        "Total number of flow XML files skipped because they could not be read or parsed"
    );
    describe_counter!(
        ANALYZER_FLOWS_EXTRACTED_TOTAL,
        "Total number of flow records extracted"
    );

    // Project Scanner
    describe_counter!(
        SCANNER_SCANS_COMPLETED_TOTAL,
        "Total number of project scans completed, by kind"
    );
    describe_histogram!(
        SCANNER_SCAN_DURATION_SECONDS,
        "Time to complete a single project scan in seconds"
    );
    describe_gauge!(
        SCANNER_PROJECTS_DISCOVERED,
        "Number of projects discovered by the most recent scan"
    );

    // Daemon
    describe_counter!(
        DAEMON_REQUESTS_TOTAL,
        "Total number of REST requests served, by result"
    );
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        ANALYZER_FILES_ANALYZED_TOTAL,
        ANALYZER_FILES_SKIPPED_TOTAL,
        ANALYZER_FLOWS_EXTRACTED_TOTAL,
        SCANNER_SCANS_COMPLETED_TOTAL,
        SCANNER_SCAN_DURATION_SECONDS,
        SCANNER_PROJECTS_DISCOVERED,
        DAEMON_REQUESTS_TOTAL,
        DAEMON_BUILD_INFO,
    ];

    #[test]
    fn all_metrics_start_with_mulescope_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("mulescope_"),
                "Metric '{}' does not start with 'mulescope_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in [
            ANALYZER_FILES_ANALYZED_TOTAL,
            ANALYZER_FILES_SKIPPED_TOTAL,
            ANALYZER_FLOWS_EXTRACTED_TOTAL,
            SCANNER_SCANS_COMPLETED_TOTAL,
            DAEMON_REQUESTS_TOTAL,
        ] {
            assert!(name.ends_with("_total"), "counter '{name}' must end with _total");
        }
    }

    #[test]
    fn metric_names_are_unique() {
        let mut names = ALL_METRIC_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_METRIC_NAMES.len());
    }

    #[test]
    fn describe_all_does_not_panic() {
        // 레코더 없이도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_SCAN_KIND, LABEL_RESULT] {
            assert_eq!(label.to_lowercase(), label);
        }
    }

    #[test]
    fn scan_duration_buckets_are_sorted() {
        let buckets = SCAN_DURATION_BUCKETS;
        for i in 1..buckets.len() {
            assert!(
                buckets[i] > buckets[i - 1],
                "Bucket values must be in ascending order"
            );
        }
    }
}
