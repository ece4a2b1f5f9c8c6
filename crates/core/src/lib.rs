//! Mulescope 공통 크레이트
//!
//! 모든 멤버 크레이트가 공유하는 최상위 에러 타입, `mulescope.toml` 설정,
//! 메트릭 이름 상수를 제공합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 최상위 에러 (`MulescopeError`) 및 도메인별 에러
//! - [`config`]: 통합 설정 (`MulescopeConfig`) 및 환경변수 오버라이드
//! - [`metrics`]: 메트릭 이름 상수와 설명 등록

pub mod config;
pub mod error;
pub mod metrics;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AnalysisError, ConfigError, MulescopeError, ScanError};

// 설정
pub use config::MulescopeConfig;
