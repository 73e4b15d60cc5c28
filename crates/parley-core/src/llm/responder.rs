//! The responder seam between the turn loop and an LLM.
//!
//! A [`Responder`] maps the full message history to exactly one new
//! assistant message. It is stateless between calls, which is why the turn
//! loop always hands it the entire conversation rather than the last line.

use std::future::Future;

use tracing::Instrument;

use parley_types::config::ChatConfig;
use parley_types::llm::{CompletionRequest, LlmError, Message, Usage};

use super::box_provider::BoxLlmProvider;

/// One reply produced by a responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: Message,
    /// Token usage, when the backend reports it.
    pub usage: Option<Usage>,
}

impl From<Message> for Reply {
    fn from(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }
}

/// Produces the next assistant message for a conversation.
pub trait Responder: Send + Sync {
    fn respond(
        &self,
        history: &[Message],
    ) -> impl Future<Output = Result<Reply, LlmError>> + Send;
}

/// Responder backed by a plain function. Handy for scripted sessions and tests.
pub struct FnResponder<F> {
    f: F,
}

/// Wrap a function as a [`Responder`].
pub fn responder_fn<F>(f: F) -> FnResponder<F>
where
    F: Fn(&[Message]) -> Result<Message, LlmError> + Send + Sync,
{
    FnResponder { f }
}

impl<F> Responder for FnResponder<F>
where
    F: Fn(&[Message]) -> Result<Message, LlmError> + Send + Sync,
{
    fn respond(
        &self,
        history: &[Message],
    ) -> impl Future<Output = Result<Reply, LlmError>> + Send {
        std::future::ready((self.f)(history).map(Reply::from))
    }
}

/// Per-request settings sent along with the history.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub system: Option<String>,
}

impl RequestSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system: config.system_prompt.clone(),
        }
    }
}

/// Production responder: turns the history into a [`CompletionRequest`]
/// and forwards it to an LLM provider.
pub struct ProviderResponder {
    provider: BoxLlmProvider,
    settings: RequestSettings,
}

impl ProviderResponder {
    pub fn new(provider: BoxLlmProvider, settings: RequestSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    fn build_request(&self, history: &[Message]) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: history.to_vec(),
            system: self.settings.system.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

impl Responder for ProviderResponder {
    async fn respond(&self, history: &[Message]) -> Result<Reply, LlmError> {
        let request = self.build_request(history);

        let span = tracing::info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            gen_ai.response.id = tracing::field::Empty,
        );

        async {
            let response = self.provider.complete(&request).await?;

            let current = tracing::Span::current();
            current.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
            current.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
            current.record(
                "gen_ai.response.finish_reasons",
                tracing::field::display(response.stop_reason),
            );
            current.record("gen_ai.response.id", response.id.as_str());
            tracing::debug!(history_len = request.messages.len(), "received completion");

            Ok::<_, LlmError>(Reply {
                message: Message::assistant(response.content),
                usage: Some(response.usage),
            })
        }
        .instrument(span)
        .await
    }
}
