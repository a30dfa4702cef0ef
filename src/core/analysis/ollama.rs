use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::common::http_client_factory::http_client_factory;

const NO_ANALYSIS: &str = "No analysis generated";

/// A language model answering a single prompt.
#[automock]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn label(&self) -> String;
    async fn complete(&self, prompt: String)
        -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Serialize, Debug)]
struct GeneratePayload<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize, Debug)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize, Debug)]
struct GenerateResult {
    response: Option<String>,
}

/// Local Ollama runtime, `/api/generate` without streaming.
pub struct OllamaProvider {
    host: String,
    model: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(
        host: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            model,
            client: http_client_factory(Some(timeout))?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn label(&self) -> String {
        format!("Ollama AI ({})", self.model)
    }

    async fn complete(
        &self,
        prompt: String,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!("requesting completion from {} ({})", self.host, self.model);

        let payload = GeneratePayload {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                num_predict: 300,
            },
        };

        let result = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResult>()
            .await?;

        Ok(result.response.unwrap_or_else(|| NO_ANALYSIS.to_string()))
    }
}
