//! Table reorganisation: hand extracted Markdown to a hosted model and ask
//! for clean, labelled tables.
//!
//! This stage is best-effort. [`Reorganizer::run`] always returns a
//! [`ReorganizeOutcome`]; it never fails the request. There is exactly one
//! attempt per request, bounded by `api_timeout_secs`.

use crate::config::{ServiceConfig, API_KEY_ENV};
use crate::error::ReorganizeError;
use crate::output::{ReorganizeOutcome, API_KEY_MISSING};
use crate::prompts::{table_extraction_request, TABLE_SYSTEM_PROMPT};
use edgequake_llm::{AnthropicProvider, ChatMessage, CompletionOptions, LLMProvider};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Something that turns extracted Markdown into reorganised tables.
pub trait TableReorganizer: Send + Sync {
    fn reorganize<'a>(
        &'a self,
        markdown: &'a str,
    ) -> BoxFuture<'a, Result<String, ReorganizeError>>;
}

/// The reorganisation stage as configured at startup.
#[derive(Clone)]
pub enum Reorganizer {
    /// A client is available and every full-pipeline request will call it.
    Ready(Arc<dyn TableReorganizer>),
    /// The stage is disabled; the reason is returned to clients verbatim.
    Unavailable(String),
}

impl std::fmt::Debug for Reorganizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reorganizer::Ready(_) => f.write_str("Reorganizer::Ready(<dyn TableReorganizer>)"),
            Reorganizer::Unavailable(reason) => {
                f.debug_tuple("Reorganizer::Unavailable").field(reason).finish()
            }
        }
    }
}

impl Reorganizer {
    /// Build the stage from the service config.
    ///
    /// Without a credential the stage is [`Reorganizer::Unavailable`] with the
    /// [`API_KEY_MISSING`] sentinel. Otherwise an Anthropic client is built
    /// from the configured key and model; nothing is read from the process
    /// environment here.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let key = match config.anthropic_api_key.as_deref() {
            Some(key) if config.has_api_key() => key,
            _ => {
                info!("No {} set; table reorganisation disabled", API_KEY_ENV);
                return Reorganizer::Unavailable(API_KEY_MISSING.to_string());
            }
        };

        let provider = AnthropicProvider::new(key).with_model(&config.model);
        info!("Table reorganisation enabled (anthropic / {})", config.model);
        Reorganizer::Ready(Arc::new(LlmReorganizer::new(Arc::new(provider), config)))
    }

    /// Attempt reorganisation once and classify the result.
    pub async fn run(&self, markdown: &str) -> ReorganizeOutcome {
        match self {
            Reorganizer::Unavailable(reason) => ReorganizeOutcome::Unavailable(reason.clone()),
            Reorganizer::Ready(client) => match client.reorganize(markdown).await {
                Ok(text) => ReorganizeOutcome::Success(text),
                Err(e) => {
                    warn!("Table reorganisation failed: {}", e);
                    ReorganizeOutcome::Failed(e.to_string())
                }
            },
        }
    }
}

/// [`TableReorganizer`] backed by an `edgequake-llm` provider.
pub struct LlmReorganizer {
    provider: Arc<dyn LLMProvider>,
    max_tokens: usize,
    temperature: f32,
    timeout_secs: u64,
}

impl LlmReorganizer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ServiceConfig) -> Self {
        Self {
            provider,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.api_timeout_secs,
        }
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

impl TableReorganizer for LlmReorganizer {
    fn reorganize<'a>(
        &'a self,
        markdown: &'a str,
    ) -> BoxFuture<'a, Result<String, ReorganizeError>> {
        Box::pin(async move {
            let start = Instant::now();
            let messages = vec![
                ChatMessage::system(TABLE_SYSTEM_PROMPT),
                ChatMessage::user(table_extraction_request(markdown)),
            ];
            let options = self.build_options();

            let response = timeout(
                Duration::from_secs(self.timeout_secs),
                self.provider.chat(&messages, Some(&options)),
            )
            .await
            .map_err(|_| ReorganizeError::Timeout {
                secs: self.timeout_secs,
            })?
            .map_err(|e| ReorganizeError::Api {
                message: e.to_string(),
            })?;

            debug!(
                "Reorganizer: {} input tokens, {} output tokens, {:?}",
                response.prompt_tokens,
                response.completion_tokens,
                start.elapsed()
            );

            if response.content.trim().is_empty() {
                return Err(ReorganizeError::EmptyResponse);
            }
            Ok(response.content)
        })
    }
}
