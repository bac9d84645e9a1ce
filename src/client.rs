//! This module provides a client to a Gemini-style text-generation endpoint

use std::error::Error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::traits::SuggestionSource;

static DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
static DEFAULT_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

// The provider's response schema, reduced to the path we read: candidates[0].content.parts[0].text.
// Every level is optional: an absent text field is a regular "no usable answer", not a parse error
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates.into_iter().next()?
            .content?
            .parts.into_iter().next()?
            .text
    }
}


/// A suggestion source that queries a remote Gemini-style generation endpoint.
///
/// Every request carries the API key as a query parameter; there is no retry, a generation is a single attempt
pub struct GeminiClient {
    base_url: Url,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client against a custom endpoint. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString, U: ToString>(base_url: S, model: T, api_key: U) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self{
            base_url,
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create a client against the public endpoint and the default model
    pub fn with_api_key<S: ToString>(api_key: S) -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .expect("cannot parse the default base URL.");
        Self{
            base_url,
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, suffix: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/models/{}{}", self.base_url, self.model, suffix))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Fetch the provider's metadata about the model.
    ///
    /// This is informational only: nothing in the generation workflow depends on its result
    pub async fn model_info(&self) -> Result<serde_json::Value, Box<dyn Error + Send + Sync>> {
        let res = reqwest::Client::new()
            .get(self.endpoint("")?)
            .send()
            .await?;

        if res.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", res.status()).into());
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl SuggestionSource for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        // The model metadata is only interesting in logs; a failure here must not fail the generation
        match self.model_info().await {
            Ok(info) => log::debug!("Model metadata: {}", info),
            Err(err) => log::warn!("Unable to fetch the model metadata: {}", err),
        }

        let request = GenerateRequest{
            contents: vec![Content{
                parts: vec![Part{ text: prompt.to_string() }],
            }],
        };

        let response = reqwest::Client::new()
            .post(self.endpoint(":generateContent")?)
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.into_text())
    }
}
