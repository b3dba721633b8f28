//! Provider abstraction - a common trait AI providers implement so the
//! client can swap between them without touching call sites.

mod anthropic;

use async_trait::async_trait;
use crate::ai::{AIResponse, Message};

pub use anthropic::AnthropicProvider;

/// A chat-completion backend.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, messages: Vec<Message>, system: Option<&str>) -> Result<AIResponse, String>;
    fn name(&self) -> &'static str;
    fn is_configured(&self) -> bool;
}

/// Provider-agnostic connection settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.0,
        }
    }
}
