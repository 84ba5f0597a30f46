//! Implements the `Advisor` trait with the Gemini `generateContent` REST API.

use crate::advisor::{Advisor, MissingApiKey};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

/// Sends prompts to a Gemini model and returns the text of its first candidate.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_base: Url,
    model: String,
    api_key: Option<String>,
}

impl GeminiAdvisor {
    /// `api_key` may be `None`, in which case every request fails with `MissingApiKey` without
    /// touching the network.
    pub fn new(api_base: Url, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl Advisor for GeminiAdvisor {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(MissingApiKey)?;
        let url = self.endpoint();
        debug!("Requesting analysis from {url}");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .context("Failed to send the request to the Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            anyhow::bail!("Gemini API request failed with status {}: {}", status, body);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse the Gemini API response")?;
        trace!("{body:?}");
        Ok(body.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            // A plain analysis does not need the model to think first, and answers faster without.
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// The concatenated text parts of the first candidate, empty if there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn advisor(key: Option<&str>) -> GeminiAdvisor {
        GeminiAdvisor::new(
            Url::from_str("https://generativelanguage.googleapis.com/v1beta/").unwrap(),
            "gemini-2.5-flash",
            key.map(String::from),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent",
            advisor(None).endpoint()
        );
    }

    #[test]
    fn test_request_body() {
        let json = serde_json::to_value(GenerateRequest::new("hi")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[test]
    fn test_response_text() {
        let json = r###"{"candidates":[{"content":{"parts":[{"text":"## Hello"},{"text":" world"}],"role":"model"}}]}"###;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!("## Hello world", response.text());
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!("", response.text());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let err = advisor(Some("  ")).complete("prompt").await.unwrap_err();
        assert!(err.is::<MissingApiKey>());
    }
}
