use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::traits::InsightProvider;
use crate::errors::CoreError;
use crate::models::insights::{
    InvestmentTips, InvestmentTipsRequest, SpendingSummary, SpendingSummaryRequest,
};

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const PROVIDER: &str = "OpenAI";

/// OpenAI chat-completions provider for the generative insight cards.
///
/// Each call asks for a JSON object whose keys match the output shape,
/// then deserializes the returned content into it.
pub struct OpenAiInsightProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiInsightProvider {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: String,
    ) -> Result<T, CoreError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.7,
        };

        let resp = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("request failed ({status})"),
            });
        }

        let body: ChatResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("failed to parse completion: {e}"),
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: "completion contained no choices".into(),
            })?;

        parse_content(&content)
    }
}

/// Deserialize the JSON object a completion returned.
pub fn parse_content<T: DeserializeOwned>(content: &str) -> Result<T, CoreError> {
    serde_json::from_str(content.trim()).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("completion did not match the expected shape: {e}"),
    })
}

// ── Chat-completions wire types ─────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl InsightProvider for OpenAiInsightProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn summarize_spending(
        &self,
        request: &SpendingSummaryRequest,
    ) -> Result<SpendingSummary, CoreError> {
        let system = "You are a personal finance advisor. Provide a monthly summary of the \
                      user's spending habits, highlighting key trends and areas where they can \
                      save money. Reply with a JSON object with a single string field \"summary\".";
        let user = format!(
            "User ID: {}\nMonthly Spending Data: {}",
            request.user_id, request.monthly_spending_data
        );
        self.complete_json(system, user).await
    }

    async fn investment_tips(
        &self,
        request: &InvestmentTipsRequest,
    ) -> Result<InvestmentTips, CoreError> {
        let system = "You are an investment advisor providing personalized investment tips. \
                      Reply with a JSON object with the string fields \"investmentTips\", \
                      \"riskAssessment\" and \"recommendationsDisclaimer\". The disclaimer must \
                      state that the tips are not financial advice.";
        let user = format!(
            "Portfolio Summary: {}\nFinancial Goals: {}\nSpending Habits: {}",
            request.portfolio_summary, request.financial_goals, request.spending_habits
        );
        self.complete_json(system, user).await
    }
}
