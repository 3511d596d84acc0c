//! # Coinlens API
//!
//! Axum 기반 REST API 서버입니다.
//!
//! - `routes`: 코인/뉴스/추천/헬스 엔드포인트
//! - `error`: 통합 에러 응답 (400/404/502/500)
//! - `state`: 공유 애플리케이션 상태
//! - `openapi`: OpenAPI 스펙 + Swagger UI

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
