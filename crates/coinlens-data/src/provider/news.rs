//! 뉴스 API 클라이언트.
//!
//! NewsAPI 호환 `/everything?q=` 계약을 사용합니다. 베이스 URL과 키가
//! 모두 설정으로 주입되므로 호환 업스트림이면 어디든 연결할 수 있습니다.

use crate::error::{DataError, Result};
use chrono::{DateTime, Utc};
use coinlens_core::config::NewsConfig;
use coinlens_core::domain::CryptoNewsItem;
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::debug;

/// 뉴스 API 클라이언트.
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

// ==================== 원시 응답 타입 ====================

#[derive(Debug, Deserialize)]
struct EverythingRaw {
    #[serde(default)]
    articles: Vec<ArticleRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRaw {
    #[serde(default)]
    source: Option<ArticleSourceRaw>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSourceRaw {
    name: Option<String>,
}

/// URL 기반의 안정적인 기사 ID를 생성합니다.
fn article_id(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

// ==================== 클라이언트 ====================

impl NewsClient {
    /// 새로운 뉴스 클라이언트를 생성합니다.
    pub fn new(config: &NewsConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    /// 암호화폐 전반 최신 헤드라인을 조회합니다.
    pub async fn latest_news(&self) -> Result<Vec<CryptoNewsItem>> {
        self.search("cryptocurrency OR bitcoin OR ethereum", &[])
            .await
    }

    /// 특정 코인 관련 뉴스를 조회합니다.
    pub async fn coin_news(&self, coin_id: &str) -> Result<Vec<CryptoNewsItem>> {
        self.search(coin_id, &[coin_id.to_string()]).await
    }

    async fn search(&self, query: &str, related: &[String]) -> Result<Vec<CryptoNewsItem>> {
        let url = format!("{}/everything", self.base_url);
        debug!(%url, query, "News request");

        let mut request = self.client.get(&url).query(&[
            ("q", query.to_string()),
            ("language", "en".to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("pageSize", self.page_size.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::upstream(status, body));
        }

        let raw: EverythingRaw = response.json().await?;

        // 제목이나 URL이 없는 기사는 렌더링할 수 없으므로 버림
        let items = raw
            .articles
            .into_iter()
            .filter_map(|article| {
                let url = article.url?;
                let title = article.title?;
                Some(CryptoNewsItem {
                    id: article_id(&url),
                    title,
                    summary: article.description,
                    url,
                    source: article.source.and_then(|s| s.name),
                    image: article.url_to_image,
                    published_at: article.published_at,
                    related_coins: related.to_vec(),
                })
            })
            .collect();

        Ok(items)
    }
}
