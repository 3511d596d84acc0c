//! Ollama chat API 클라이언트.
//!
//! 로컬에 호스팅된 Ollama의 `/api/chat` 엔드포인트를 비스트리밍으로
//! 호출합니다. 요청/응답 형식은 Ollama chat API를 따릅니다:
//! <https://github.com/ollama/ollama/blob/main/docs/api.md>

use crate::error::{AdvisorError, Result};
use coinlens_core::config::LlmConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// ==================== 요청 타입 ====================

/// Ollama chat 요청.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// 모델 이름 (예: "llama3.2", "mistral")
    pub model: String,
    /// 대화 메시지
    pub messages: Vec<ChatMessage>,
    /// 항상 false (단일 응답)
    pub stream: bool,
    /// 생성 옵션
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
}

/// 대화 메시지.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// "system", "user", "assistant" 중 하나
    pub role: String,
    /// 메시지 내용
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 생성 옵션.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    /// 샘플링 temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// 최대 생성 토큰 수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

// ==================== 응답 타입 ====================

/// Ollama chat 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// 사용한 모델
    pub model: String,
    /// 생성된 메시지
    pub message: ChatResponseMessage,
    /// 생성 완료 여부
    pub done: bool,
    /// 프롬프트 토큰 수
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// 생성 토큰 수
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// 응답 메시지 (role은 항상 "assistant").
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub role: String,
    pub content: String,
}

// ==================== 클라이언트 ====================

/// Ollama 클라이언트.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    num_predict: Option<u32>,
}

impl OllamaClient {
    /// 새로운 Ollama 클라이언트를 생성합니다.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.num_predict,
        })
    }

    /// 설정된 모델 이름.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ollama 도달 가능 여부를 확인합니다 (GET /api/tags).
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// 단일 chat 완성을 요청합니다.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(%url, model = %self.model, messages = messages.len(), "Ollama chat request");

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            options: Some(ChatOptions {
                temperature: Some(self.temperature),
                num_predict: self.num_predict,
            }),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if chat.message.content.trim().is_empty() {
            return Err(AdvisorError::EmptyResponse);
        }

        Ok(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> LlmConfig {
        LlmConfig {
            base_url,
            model: "llama3.2".to_string(),
            temperature: 0.7,
            num_predict: Some(256),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = ChatRequest {
            model: "llama3.2".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            stream: false,
            options: Some(ChatOptions {
                temperature: Some(0.7),
                num_predict: Some(256),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["options"]["num_predict"], 256);
    }

    #[tokio::test]
    async fn test_chat_parses_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "llama3.2",
                    "created_at": "2026-08-29T12:00:00Z",
                    "message": {"role": "assistant", "content": "Bitcoin looks volatile."},
                    "done": true,
                    "prompt_eval_count": 120,
                    "eval_count": 45
                }"#,
            )
            .create_async()
            .await;

        let client = OllamaClient::new(&test_config(server.url())).unwrap();
        let response = client.chat(vec![ChatMessage::user("analyze btc")]).await.unwrap();

        assert_eq!(response.message.content, "Bitcoin looks volatile.");
        assert_eq!(response.prompt_eval_count, Some(120));
        assert_eq!(response.eval_count, Some(45));
    }

    #[tokio::test]
    async fn test_chat_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body(r#"{"error": "model not loaded"}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&test_config(server.url())).unwrap();
        let err = client.chat(vec![ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::UpstreamStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "llama3.2",
                    "message": {"role": "assistant", "content": "  "},
                    "done": true
                }"#,
            )
            .create_async()
            .await;

        let client = OllamaClient::new(&test_config(server.url())).unwrap();
        let err = client.chat(vec![ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, AdvisorError::EmptyResponse));
    }
}
