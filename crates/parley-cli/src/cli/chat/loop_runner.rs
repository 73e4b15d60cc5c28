//! Chat session orchestration.
//!
//! Wires configuration, credentials, the Anthropic provider, and the
//! terminal adapters into a [`TurnLoop`] and runs it to completion.

use std::io::Write;

use console::style;
use tracing::info;

use parley_core::chat::turn_loop::{TurnLoop, TurnLoopSettings};
use parley_core::llm::responder::{ProviderResponder, RequestSettings};
use parley_infra::llm::create_provider;
use parley_infra::secret::EnvSecretProvider;
use parley_types::chat::ChatSession;
use parley_types::config::ChatConfig;

use super::banner::write_welcome_banner;
use super::input::ChatInput;
use super::output::TerminalOutput;
use super::renderer::ChatRenderer;

/// Presentation switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub plain: bool,
    pub quiet: bool,
}

/// Run one conversation until the user exits or the responder gives up.
///
/// Returns an error when the session is aborted, so the process exits
/// non-zero.
pub async fn run_chat(config: ChatConfig, options: ChatOptions) -> anyhow::Result<()> {
    let api_key = EnvSecretProvider::new().api_key(&config.provider.api_key_env)?;
    let provider = create_provider(&config, api_key)?;
    let responder = ProviderResponder::new(provider, RequestSettings::from_config(&config));

    let settings = TurnLoopSettings::from_config(&config);
    let session = ChatSession::start(config.model.clone());
    info!(
        session_id = %session.id,
        provider = responder.provider_name(),
        model = %config.model,
        "starting chat"
    );

    let interactive = ChatInput::stdin_is_terminal();
    let (mut input, writer): (ChatInput, Box<dyn Write + Send>) = if interactive {
        let prompt = format!("  {} ", style("You >").green().bold());
        let (input, writer) = ChatInput::terminal(prompt)
            .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;
        (input, Box::new(writer))
    } else {
        (ChatInput::stdin(), Box::new(std::io::stdout()))
    };

    let render = !options.plain && console::Term::stdout().is_term();
    let renderer = render.then(ChatRenderer::new);
    let mut output = TerminalOutput::new(writer, renderer);

    if !options.quiet {
        write_welcome_banner(
            output.writer(),
            &config.model,
            &session.short_id(),
            &settings.exit_keywords.hint(),
        )?;
    }

    let mut turn_loop = TurnLoop::new(responder, settings, session);
    let result = turn_loop.run(&mut input, &mut output).await;
    input.finish();

    let (conversation, session) = turn_loop.finish();
    info!(
        session_id = %session.id,
        status = %session.status,
        turns = session.turn_count,
        messages = conversation.len(),
        input_tokens = session.total_input_tokens,
        output_tokens = session.total_output_tokens,
        "chat finished"
    );

    result.map_err(anyhow::Error::from)
}
