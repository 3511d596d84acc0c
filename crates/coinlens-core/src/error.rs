//! 시스템 공통 에러 타입.
//!
//! 설정 로드와 로깅 초기화 등 부트스트랩 단계의 오류가 이 타입으로
//! 수렴합니다. 데이터/추천/API 크레이트는 각자의 에러 타입을 가집니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 로깅 초기화 에러
    #[error("로깅 초기화 에러: {0}")]
    Logging(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// 핵심 연산 Result 타입.
pub type Result<T> = std::result::Result<T, CoreError>;
