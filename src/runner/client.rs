//! @ai:module:intent HTTP client for text-generation services
//! @ai:module:layer infrastructure
//! @ai:module:public_api GeneratorTrait, HttpGenerator, MockGenerator
//! @ai:module:stateless false

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// @ai:intent Trait for a model that continues a code prefix
#[allow(async_fn_in_trait)]
pub trait GeneratorTrait: Send + Sync {
    /// @ai:intent Model name used for the prediction file
    fn name(&self) -> &str;

    /// @ai:intent Generate a continuation of the input
    async fn generate(&self, input: &str) -> Result<String>;
}

/// @ai:intent Generation request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
}

/// @ai:intent Generation response body; some servers wrap it in a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(Generated),
    Batch(Vec<Generated>),
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

impl GenerateResponse {
    /// @ai:intent First generation, empty when the service produced none
    /// @ai:effects pure
    fn into_text(self) -> String {
        match self {
            GenerateResponse::Single(generated) => generated.generated_text,
            GenerateResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .unwrap_or_default(),
        }
    }
}

/// @ai:intent Client for a text-generation endpoint
pub struct HttpGenerator {
    client: reqwest::Client,
    config: ModelConfig,
}

impl HttpGenerator {
    /// @ai:intent Create a generator for one configured model
    /// @ai:effects pure
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Generation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

impl GeneratorTrait for HttpGenerator {
    fn name(&self) -> &str {
        &self.config.name
    }

    /// @ai:intent POST the input and return the generated text
    /// @ai:effects network
    async fn generate(&self, input: &str) -> Result<String> {
        let request = GenerateRequest {
            inputs: input,
            parameters: GenerateParameters {
                max_new_tokens: self.config.max_new_tokens,
            },
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Failed to reach {}: {}", self.config.name, e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "{} returned {}: {}",
                self.config.name, status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            Error::Generation(format!("Failed to parse {} response: {}", self.config.name, e))
        })?;

        Ok(body.into_text())
    }
}

/// @ai:intent Mock generator for dry runs and tests
pub struct MockGenerator {
    name: String,
    response: String,
}

impl MockGenerator {
    /// @ai:intent Create a mock generator that returns a fixed response
    /// @ai:effects pure
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
        }
    }
}

impl GeneratorTrait for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    /// @ai:intent Return mock response
    /// @ai:effects pure
    async fn generate(&self, _input: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}
