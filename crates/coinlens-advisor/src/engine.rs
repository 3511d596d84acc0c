//! 추천 엔진.
//!
//! 현재 시장 스냅샷과 사용자 질의로 프롬프트를 구성하고 Ollama를 호출하여
//! `Recommendation`을 생성합니다. 생성 결과에는 항상 고정 면책 문구가
//! 포함됩니다.
//!
//! 프롬프트 조립은 순수 함수로 분리되어 있어 LLM 없이 단위 테스트됩니다.

use crate::error::Result;
use crate::ollama::{ChatMessage, OllamaClient};
use chrono::Utc;
use coinlens_core::domain::{
    CryptoCurrency, CryptoCurrencyDetail, Recommendation, RECOMMENDATION_DISCLAIMER,
};
use coinlens_data::MarketDataManager;
use std::sync::Arc;
use tracing::{info, warn};

/// 컨텍스트 스냅샷에 포함할 상위 코인 수.
const CONTEXT_TOP_COINS: u32 = 10;

/// 추천 엔진.
pub struct AdvisorEngine {
    ollama: OllamaClient,
    market: Arc<MarketDataManager>,
}

impl AdvisorEngine {
    /// 새로운 추천 엔진을 생성합니다.
    pub fn new(ollama: OllamaClient, market: Arc<MarketDataManager>) -> Self {
        Self { ollama, market }
    }

    /// 설정된 모델 이름.
    pub fn model(&self) -> &str {
        self.ollama.model()
    }

    /// LLM 도달 가능 여부.
    pub async fn llm_health_check(&self) -> bool {
        self.ollama.health_check().await
    }

    /// 사용자 질의에 대한 투자 코멘터리를 생성합니다.
    ///
    /// `coin_ids`가 주어지면 해당 코인의 상세 정보를 컨텍스트에 포함합니다.
    /// 개별 코인 조회 실패는 컨텍스트에서 빠질 뿐 요청 전체를 실패시키지
    /// 않습니다. LLM 호출 실패는 그대로 전파됩니다.
    pub async fn recommend(&self, query: &str, coin_ids: &[String]) -> Result<Recommendation> {
        // 시장 스냅샷: 상위 코인 목록 (캐시 경유)
        let top_coins = self
            .market
            .list_coins("usd", CONTEXT_TOP_COINS)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Top coins snapshot unavailable, continuing without it");
                Vec::new()
            });

        // 요청된 코인 상세
        let mut details = Vec::new();
        for id in coin_ids {
            match self.market.coin_detail(id).await {
                Ok(detail) => details.push(detail),
                Err(e) => warn!(id, error = %e, "Coin detail unavailable for context"),
            }
        }

        let messages = vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(build_user_prompt(query, &top_coins, &details)),
        ];

        let response = self.ollama.chat(messages).await?;

        info!(
            model = %response.model,
            prompt_tokens = ?response.prompt_eval_count,
            completion_tokens = ?response.eval_count,
            "Recommendation generated"
        );

        Ok(Recommendation {
            model: response.model,
            content: response.message.content,
            disclaimer: RECOMMENDATION_DISCLAIMER.to_string(),
            prompt_tokens: response.prompt_eval_count,
            completion_tokens: response.eval_count,
            generated_at: Utc::now(),
        })
    }
}

// ==================== 프롬프트 조립 (순수 함수) ====================

/// 고정 시스템 프롬프트.
fn system_prompt() -> &'static str {
    "You are a cryptocurrency market analyst. Provide balanced, factual \
     commentary based on the market data supplied in the user message. \
     Discuss both upside and downside risks. Never present your output as \
     financial advice, and do not invent prices or figures that are not in \
     the supplied data."
}

/// 시장 컨텍스트와 질의를 하나의 사용자 메시지로 조립합니다.
fn build_user_prompt(
    query: &str,
    top_coins: &[CryptoCurrency],
    details: &[CryptoCurrencyDetail],
) -> String {
    let mut prompt = String::new();

    if !top_coins.is_empty() {
        prompt.push_str("Current top coins by market cap:\n");
        for coin in top_coins {
            prompt.push_str(&format_coin_line(coin));
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    for detail in details {
        prompt.push_str(&format_detail_block(detail));
        prompt.push('\n');
    }

    prompt.push_str("Question: ");
    prompt.push_str(query.trim());
    prompt
}

fn format_coin_line(coin: &CryptoCurrency) -> String {
    let price = coin
        .current_price
        .map(|p| format!("${}", p))
        .unwrap_or_else(|| "n/a".to_string());
    let change = coin
        .price_change_percentage_24h
        .map(|c| format!("{}%", c))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "- {} ({}): price {}, 24h change {}",
        coin.name,
        coin.symbol.to_uppercase(),
        price,
        change
    )
}

fn format_detail_block(detail: &CryptoCurrencyDetail) -> String {
    let mut block = format!(
        "Details for {} ({}):\n",
        detail.name,
        detail.symbol.to_uppercase()
    );

    if let Some(price) = detail.current_price {
        block.push_str(&format!("  price: ${}\n", price));
    }
    if let Some(cap) = detail.market_cap {
        block.push_str(&format!("  market cap: ${}\n", cap));
    }
    if let Some(change) = detail.price_change_percentage_24h {
        block.push_str(&format!("  24h change: {}%\n", change));
    }
    if let Some(ath) = detail.ath {
        block.push_str(&format!("  all-time high: ${}\n", ath));
    }
    if let Some(supply) = detail.circulating_supply {
        block.push_str(&format!("  circulating supply: {}\n", supply));
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_coin() -> CryptoCurrency {
        CryptoCurrency {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            current_price: Some(dec!(64000)),
            market_cap: None,
            market_cap_rank: Some(1),
            price_change_percentage_24h: Some(dec!(-1.2)),
            total_volume: None,
            circulating_supply: None,
            total_supply: None,
            image: None,
        }
    }

    fn sample_detail() -> CryptoCurrencyDetail {
        CryptoCurrencyDetail {
            id: "ethereum".to_string(),
            symbol: "eth".to_string(),
            name: "Ethereum".to_string(),
            description: None,
            homepage: None,
            image: None,
            current_price: Some(dec!(3300)),
            market_cap: Some(dec!(400000000000)),
            market_cap_rank: Some(2),
            price_change_percentage_24h: Some(dec!(2.5)),
            total_volume: None,
            high_24h: None,
            low_24h: None,
            ath: Some(dec!(4878)),
            ath_date: None,
            atl: None,
            circulating_supply: Some(dec!(120000000)),
            total_supply: None,
            last_updated: None,
        }
    }

    #[test]
    fn test_user_prompt_contains_context_and_query() {
        let prompt = build_user_prompt(
            "  Should I buy ETH?  ",
            &[sample_coin()],
            &[sample_detail()],
        );

        assert!(prompt.contains("Bitcoin (BTC): price $64000, 24h change -1.2%"));
        assert!(prompt.contains("Details for Ethereum (ETH):"));
        assert!(prompt.contains("all-time high: $4878"));
        assert!(prompt.ends_with("Question: Should I buy ETH?"));
    }

    #[test]
    fn test_user_prompt_without_context_is_just_the_question() {
        let prompt = build_user_prompt("What is staking?", &[], &[]);
        assert_eq!(prompt, "Question: What is staking?");
    }

    #[test]
    fn test_missing_fields_render_as_na() {
        let mut coin = sample_coin();
        coin.current_price = None;
        coin.price_change_percentage_24h = None;

        let line = format_coin_line(&coin);
        assert_eq!(line, "- Bitcoin (BTC): price n/a, 24h change n/a");
    }

    #[test]
    fn test_system_prompt_forbids_financial_advice() {
        assert!(system_prompt().contains("financial advice"));
    }
}
