use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use jarvis_chat::catalog;
use jarvis_chat::config::Config;
use jarvis_chat::repl::{Command, apply_setting};
use jarvis_chat::visual::Visual;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let mut session = match jarvis_chat::build_session(&config) {
        Ok(session) => session,
        Err(e) => {
            Visual::error(&e.to_string());
            eprintln!("Required settings (env or config.yaml):");
            eprintln!("  HUGGINGFACE_TOKEN=hf_your_token_here");
            eprintln!("  DEFAULT_MODEL=microsoft/DialoGPT-large");
            eprintln!("  DEFAULT_ENDPOINT_TYPE=\"Inference API\"");
            return Err(e.into());
        }
    };

    Visual::banner(&session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        Visual::prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Say(text) => {
                let persona = session.persona().clone();
                let reply = session
                    .submit_with(&text, |phase| Visual::phase(phase, &persona))
                    .await;
                Visual::reply(&reply, &persona);
            }
            Command::Help => Visual::help(),
            Command::History => Visual::history(&session),
            Command::Clear => {
                session.clear();
                Visual::success("Chat history cleared");
            }
            Command::Models => Visual::models(session.model_id()),
            Command::Model(query) => match catalog::find(&query) {
                Some(entry) => match session.select_model(entry.id) {
                    Ok(()) => Visual::success(&format!("Current model: {}", entry.display_name)),
                    Err(e) => Visual::error(&e.to_string()),
                },
                None => Visual::warn(&format!("No model matches '{query}'. Try /models")),
            },
            Command::Test => {
                let name = catalog::display_name(session.model_id()).to_string();
                Visual::warn("Testing model availability...");
                if session.test_model().await {
                    Visual::success(&format!("{name} is available!"));
                } else {
                    Visual::error(&format!("{name} is not available. Try another model."));
                }
            }
            Command::Set { key, value } => {
                match apply_setting(*session.settings(), &key, &value)
                    .and_then(|next| session.update_settings(next))
                {
                    Ok(()) => Visual::settings(&session),
                    Err(e) => Visual::error(&e.to_string()),
                }
            }
            Command::Stats => {
                Visual::stats(session.stats());
                Visual::settings(&session);
            }
            Command::Quit => break,
            Command::Unknown(raw) => Visual::warn(&format!("Unknown command '{raw}'. Try /help")),
        }
    }

    tracing::info!(session = %session.id(), "Session ended");
    Ok(())
}
