//! @ai:module:intent Reject candidates whose model input exceeds any token budget
//! @ai:module:layer domain
//! @ai:module:public_api TokenCounter, HfTokenCounter, TokenBudget, BudgetFilter
//! @ai:module:stateless true

use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// @ai:intent Tokenizer service: counts sub-word tokens in a text
pub trait TokenCounter: Send + Sync {
    /// @ai:intent Number of tokens the text encodes to, without special tokens
    fn count(&self, text: &str) -> Result<usize>;
}

/// @ai:intent HuggingFace tokenizer loaded from a `tokenizer.json`
pub struct HfTokenCounter {
    inner: tokenizers::Tokenizer,
}

impl HfTokenCounter {
    /// @ai:intent Load a tokenizer from a local file
    /// @ai:effects fs:read
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            Error::Tokenizer(format!("Failed to load tokenizer from {}: {}", path.display(), e))
        })?;
        Ok(Self { inner })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count(&self, text: &str) -> Result<usize> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| Error::Tokenizer(format!("Encoding error: {}", e)))?;
        Ok(encoding.get_ids().len())
    }
}

/// @ai:intent A named model family's token budget
pub struct TokenBudget {
    pub name: String,
    pub max_tokens: usize,
    counter: Box<dyn TokenCounter>,
}

impl TokenBudget {
    /// @ai:intent Pair a tokenizer service with its threshold
    /// @ai:effects pure
    pub fn new(name: impl Into<String>, max_tokens: usize, counter: Box<dyn TokenCounter>) -> Self {
        Self {
            name: name.into(),
            max_tokens,
            counter,
        }
    }

    /// @ai:intent Load the tokenizer a budget config points at
    /// @ai:effects fs:read
    pub fn from_config(config: &BudgetConfig) -> Result<Self> {
        let counter = HfTokenCounter::from_file(&config.tokenizer_file)?;
        Ok(Self::new(&config.name, config.max_tokens, Box::new(counter)))
    }

    /// @ai:intent Whether the text fits within this budget
    /// @ai:effects pure
    pub fn admits(&self, text: &str) -> Result<bool> {
        Ok(self.counter.count(text)? <= self.max_tokens)
    }
}

/// @ai:intent Conjunction of independent token budgets
pub struct BudgetFilter {
    budgets: Vec<TokenBudget>,
}

impl BudgetFilter {
    /// @ai:intent Create a filter over caller-owned budgets
    /// @ai:pre budgets is non-empty
    /// @ai:effects pure
    pub fn new(budgets: Vec<TokenBudget>) -> Result<Self> {
        if budgets.is_empty() {
            return Err(Error::config("At least one token budget must be configured"));
        }
        Ok(Self { budgets })
    }

    /// @ai:intent Load every configured tokenizer
    /// @ai:effects fs:read
    pub fn from_configs(configs: &[BudgetConfig]) -> Result<Self> {
        let budgets = configs
            .iter()
            .map(TokenBudget::from_config)
            .collect::<Result<Vec<_>>>()?;
        Self::new(budgets)
    }

    /// @ai:intent Full text a model sees: signatures, then the function up to the call's end
    /// @ai:effects pure
    pub fn model_input(signatures: &[String], function_text: &str, end: usize) -> String {
        format!("{} {}", signatures.join(" "), &function_text[..end])
    }

    /// @ai:intent Accept only when the input is within every budget
    /// @ai:effects pure
    pub fn admits(&self, model_input: &str) -> Result<bool> {
        for budget in &self.budgets {
            if !budget.admits(model_input)? {
                tracing::debug!("Candidate exceeds the {} budget of {} tokens", budget.name, budget.max_tokens);
                return Ok(false);
            }
        }
        Ok(true)
    }
}
