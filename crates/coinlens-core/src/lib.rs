//! # Coinlens Core
//!
//! 암호화폐 시장 데이터 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 시장 데이터 구조체 (코인 목록, 상세, 차트, 시장 개요)
//! - 뉴스 구조체
//! - LLM 추천 결과 구조체
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
