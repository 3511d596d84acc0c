//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! # 상태 코드 매핑
//!
//! - 400 `VALIDATION_ERROR`: 필드 단위 상세가 details에 포함
//! - 404 `NOT_FOUND`: 알 수 없는 코인/리소스
//! - 502 `UPSTREAM_ERROR`: 업스트림 API/LLM 장애
//! - 500 `INTERNAL`: 일반 메시지만 노출, 전체 오류는 서버 로그에만 기록

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinlens_advisor::AdvisorError;
use coinlens_data::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Coin not found: dogecoin2",
///   "timestamp": 1756512000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

/// 핸들러 에러.
///
/// `IntoResponse`로 상태 코드와 `ApiErrorResponse` JSON에 매핑됩니다.
#[derive(Debug)]
pub enum ApiError {
    /// 요청 검증 실패 (400)
    Validation { message: String, details: Value },
    /// 리소스 없음 (404)
    NotFound(String),
    /// 업스트림 API/LLM 장애 (502)
    Upstream(String),
    /// 내부 오류 (500) - 전체 내용은 로그에만 남김
    Internal(String),
}

impl ApiError {
    /// validator 검증 오류를 필드 단위 details로 변환합니다.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or(Value::Null);
        Self::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(resource) => Self::NotFound(format!("Not found: {}", resource)),
            DataError::Http(_) | DataError::UpstreamStatus { .. } | DataError::YahooError(_) => {
                Self::Upstream(err.to_string())
            }
            DataError::SerializationError(_)
            | DataError::CacheError(_)
            | DataError::ConfigError(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::MarketData(data_err) => Self::from(data_err),
            AdvisorError::Http(_)
            | AdvisorError::UpstreamStatus { .. }
            | AdvisorError::EmptyResponse => Self::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::with_details("VALIDATION_ERROR", message, details),
            ),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ApiErrorResponse::new("NOT_FOUND", message),
            ),
            Self::Upstream(message) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorResponse::new("UPSTREAM_ERROR", message),
            ),
            Self::Internal(detail) => {
                // 내부 오류 상세는 클라이언트에 노출하지 않음
                error!(error = %detail, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("INTERNAL", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;
