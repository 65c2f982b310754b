use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

pub mod extract;
pub mod gemini;
pub mod prompts;
pub mod services;

/// One piece of a multimodal prompt.
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    InlineImage { mime_type: String, data: Bytes },
}

/// Text generation endpoint. Returns the model's raw text output.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, parts: Vec<Part>) -> anyhow::Result<String>;
}

/// Result of a model call after parsing: either the model's payload or the
/// fixed value used when the call or its output could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Parsed(T),
    Fallback { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn source(&self) -> Source {
        if self.is_fallback() {
            Source::Fallback
        } else {
            Source::Model
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Parsed(v) => v,
            Outcome::Fallback { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Fallback,
}
