//! @ai:module:intent Configuration structs for corpus construction and prediction runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchConfig, CorpusConfig, BudgetConfig, ModelConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for callbench
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default = "default_budgets")]
    pub budgets: Vec<BudgetConfig>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// @ai:intent Sampling parameters for corpus construction
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_completion_probability")]
    pub completion_probability: f64,
    #[serde(default = "default_max_completions")]
    pub max_completions_per_function: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// @ai:intent One token budget: a tokenizer and the maximum input length it admits
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub name: String,
    pub tokenizer_file: PathBuf,
    pub max_tokens: usize,
}

/// @ai:intent A text-generation service reachable over HTTP
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub endpoint: String,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            budgets: default_budgets(),
            models: Vec::new(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            completion_probability: default_completion_probability(),
            max_completions_per_function: default_max_completions(),
            seed: default_seed(),
        }
    }
}

fn default_completion_probability() -> f64 {
    0.5
}

fn default_max_completions() -> usize {
    3
}

fn default_seed() -> u64 {
    42
}

fn default_max_new_tokens() -> u32 {
    128
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_budgets() -> Vec<BudgetConfig> {
    vec![
        BudgetConfig {
            name: "unixcoder".to_string(),
            tokenizer_file: PathBuf::from("tokenizers/unixcoder/tokenizer.json"),
            max_tokens: 924,
        },
        BudgetConfig {
            name: "codegpt".to_string(),
            tokenizer_file: PathBuf::from("tokenizers/codegpt/tokenizer.json"),
            max_tokens: 924,
        },
        BudgetConfig {
            name: "incoder".to_string(),
            tokenizer_file: PathBuf::from("tokenizers/incoder/tokenizer.json"),
            max_tokens: 1948,
        },
    ]
}

impl BenchConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Toml(e.to_string()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Toml(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Look up configured models by name, all of them when no names are given
    /// @ai:effects pure
    pub fn select_models(&self, names: Option<&[String]>) -> Result<Vec<ModelConfig>> {
        let Some(names) = names else {
            return Ok(self.models.clone());
        };

        names
            .iter()
            .map(|name| {
                self.models
                    .iter()
                    .find(|m| &m.name == name)
                    .cloned()
                    .ok_or_else(|| Error::config(format!("Unknown model: {}", name)))
            })
            .collect()
    }
}

impl CorpusConfig {
    /// @ai:intent Reject sampling parameters that cannot produce a meaningful corpus
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.completion_probability) {
            return Err(Error::config(format!(
                "completion_probability must be within [0, 1], got {}",
                self.completion_probability
            )));
        }
        Ok(())
    }
}
