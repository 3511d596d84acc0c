//! 도메인 모델.
//!
//! 업스트림 API 응답의 읽기 전용 프로젝션입니다.
//! 영속 저장소가 없으므로 모든 엔티티는 캐시 엔트리 수명만 가집니다.

pub mod advice;
pub mod market;
pub mod news;

pub use advice::*;
pub use market::*;
pub use news::*;
