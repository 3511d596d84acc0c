//! 어드바이저 모듈 오류 타입.

use thiserror::Error;

/// LLM 추천 관련 오류.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// HTTP 요청 오류 (연결 실패, 타임아웃 등)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// LLM 업스트림이 에러 상태 코드를 반환
    #[error("LLM returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// LLM이 빈 응답을 반환
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// 시장 컨텍스트 조회 오류
    #[error("Market data error: {0}")]
    MarketData(#[from] coinlens_data::DataError),
}

/// 어드바이저 연산 Result 타입.
pub type Result<T> = std::result::Result<T, AdvisorError>;
