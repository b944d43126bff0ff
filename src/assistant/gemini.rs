//! Gemini API連携
//!
//! generateContent エンドポイントへテキストのみのリクエストを送る。

use super::{sanitize_term, SearchAssistant};
use crate::error::{SearchError, Result};
use async_trait::async_trait;
use intent_search_common::{
    build_enhance_prompt, build_suggest_prompt, parse_enhance_response,
    parse_suggestions_response, PhraseCatalog,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiRequest {
    fn text(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

/// Gemini API経由のアシスタント
pub struct GeminiAssistant {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    catalog: PhraseCatalog,
}

impl GeminiAssistant {
    pub fn new(
        api_key: String,
        model: &str,
        timeout: Duration,
        catalog: PhraseCatalog,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::ApiCall(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/{}:generateContent", GEMINI_API_BASE, model),
            catalog,
        })
    }

    /// Gemini API呼び出し（共通処理）
    async fn call(&self, prompt: String) -> Result<String> {
        let request = GeminiRequest::text(prompt);

        tracing::debug!(endpoint = %self.endpoint, "Gemini API呼び出し");

        let response = self
            .client
            .post(format!("{}?key={}", self.endpoint, self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::ApiCall(format!("Gemini API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiCall(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ApiParse(format!("Gemini APIレスポンス: {}", e)))?;

        extract_text(payload)
    }
}

/// 先頭候補のテキストを取り出す
fn extract_text(payload: GeminiResponse) -> Result<String> {
    payload
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| SearchError::ApiParse("Empty response".into()))
}

#[async_trait]
impl SearchAssistant for GeminiAssistant {
    async fn enhance(&self, query: &str) -> Result<Option<String>> {
        let text = self.call(build_enhance_prompt(query, &self.catalog)).await?;
        let enhanced = parse_enhance_response(&text)
            .map_err(|e| SearchError::ApiParse(format!("補正レスポンス: {}", e)))?;
        Ok(enhanced.as_deref().and_then(sanitize_term))
    }

    async fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<String>> {
        let text = self.call(build_suggest_prompt(partial, limit)).await?;
        parse_suggestions_response(&text, limit)
            .map_err(|e| SearchError::ApiParse(format!("入力候補レスポンス: {}", e)))
    }

    fn name(&self) -> &str {
        "gemini-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest::text("hola".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_extract_text() {
        let payload: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"enhancedQuery\": \"pintor\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(payload).unwrap(), r#"{"enhancedQuery": "pintor"}"#);
    }

    #[test]
    fn test_extract_text_empty() {
        let payload: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_text(payload), Err(SearchError::ApiParse(_))));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let assistant = GeminiAssistant::new(
            "key".to_string(),
            "gemini-2.0-flash",
            Duration::from_secs(5),
            PhraseCatalog::builtin(),
        )
        .unwrap();
        assert!(assistant.endpoint.ends_with("/gemini-2.0-flash:generateContent"));
    }
}
