use anyhow::Context;
use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{GenerativeModel, Part};
use crate::config::GeminiConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Google Generative Language API client (`models/{model}:generateContent`).
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn to_content_part(part: Part) -> ContentPart {
        match part {
            Part::Text(text) => ContentPart::Text { text },
            Part::InlineImage { mime_type, data } => ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: Base64::encode_string(&data),
                },
            },
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[instrument(skip(self, parts), fields(model = %self.model))]
    async fn generate(&self, parts: Vec<Part>) -> anyhow::Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: parts.into_iter().map(Self::to_content_part).collect(),
            }],
        };

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = response.status();
        let text = response.text().await.context("read gemini response")?;
        if !status.is_success() {
            error!(%status, "gemini api error");
            anyhow::bail!("gemini returned {status}");
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("parse gemini response")?;
        if let Some(err) = parsed.error {
            anyhow::bail!("gemini error: {}", err.message);
        }

        let output: String = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text),
                        ContentPart::InlineData { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if output.is_empty() {
            anyhow::bail!("gemini returned no text");
        }
        debug!(chars = output.len(), "gemini response received");
        Ok(output)
    }
}
