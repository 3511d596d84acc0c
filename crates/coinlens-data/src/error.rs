//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 오류 (연결 실패, 타임아웃 등)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 업스트림이 에러 상태 코드를 반환
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// 리소스를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 캐시 오류
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Yahoo Finance 오류
    #[error("Yahoo Finance error: {0}")]
    YahooError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DataError {
    /// 상태 코드 응답에서 업스트림 오류를 생성합니다.
    pub fn upstream(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// NotFound 여부.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// 데이터 연산 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
