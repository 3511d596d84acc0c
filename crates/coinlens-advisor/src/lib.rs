//! # Coinlens Advisor
//!
//! 로컬 LLM(Ollama) 기반 투자 코멘터리 엔진입니다.
//!
//! - `ollama`: Ollama chat API 클라이언트 (비스트리밍)
//! - `engine`: 시장 스냅샷 + 사용자 질의로 프롬프트를 구성하고
//!   `Recommendation`을 생성

pub mod engine;
pub mod error;
pub mod ollama;

pub use engine::AdvisorEngine;
pub use error::{AdvisorError, Result};
pub use ollama::OllamaClient;
