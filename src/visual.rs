//! Terminal rendering for the chat REPL
use chrono::Local;
use colored::*;
use std::io::{self, Write};

use crate::catalog::{self, AVAILABLE_MODELS};
use crate::client::TurnPhase;
use crate::conversation::ChatStats;
use crate::models::{Message, Role};
use crate::normalize::Reply;
use crate::persona::Persona;
use crate::session::ChatSession;

pub struct Visual;

impl Visual {
    pub fn banner(session: &ChatSession) {
        let persona = session.persona();
        println!(
            "{} {}",
            "🤖".bright_cyan(),
            format!("{} - AI Assistant", persona.name).bold().bright_cyan()
        );
        println!("   {}", persona.long_name.italic().dimmed());
        println!(
            "   {} {}  {} {}",
            "🧠".bright_yellow(),
            catalog::display_name(session.model_id()).bright_yellow(),
            "🌐".bright_blue(),
            session.endpoint_kind().to_string().bright_blue()
        );
        println!("   {}", "Type /help for commands.".dimmed());
    }

    pub fn prompt() {
        print!("{} ", "👤 You ›".bold().blue());
        let _ = io::stdout().flush();
    }

    pub fn message(msg: &Message, persona: &Persona) {
        match msg.role {
            Role::User => println!("{} {}", "👤 You:".bold().blue(), msg.content),
            Role::Assistant => Self::assistant(&msg.content, persona),
        }
    }

    pub fn history(session: &ChatSession) {
        let messages = session.conversation().messages();
        if messages.is_empty() {
            println!("   {}", "No messages yet.".dimmed());
        }
        for msg in messages {
            print!("   {} ", sent_time(msg).dimmed());
            Self::message(msg, session.persona());
        }
    }

    pub fn assistant(text: &str, persona: &Persona) {
        println!("{} {}", format!("🤖 {}:", persona.name).bold().green(), text.white());
    }

    pub fn reply(reply: &Reply, persona: &Persona) {
        if let Some(notice) = &reply.notice {
            Self::warn(notice);
        }
        Self::assistant(&reply.text, persona);
    }

    pub fn phase(phase: TurnPhase, persona: &Persona) {
        match phase {
            TurnPhase::Sending => {
                eprintln!("   {}", format!("🧠 {} is thinking...", persona.name).dimmed())
            }
            TurnPhase::WarmingUp => {
                eprintln!("   {}", "⏳ Model is loading. This may take a few moments...".yellow())
            }
            TurnPhase::RetrySending => eprintln!("   {}", "🔁 Retrying...".dimmed()),
            TurnPhase::Done | TurnPhase::Idle => {}
        }
    }

    pub fn warn(text: &str) {
        eprintln!("   {} {}", "⚠".bright_yellow(), text.yellow());
    }

    pub fn error(text: &str) {
        eprintln!("{} {}", "🚨".bright_red(), text.red());
    }

    pub fn success(text: &str) {
        println!("   {} {}", "✅".green(), text.green());
    }

    pub fn models(current: &str) {
        println!("   {}", "Available models:".bright_cyan());
        for (i, m) in AVAILABLE_MODELS.iter().enumerate() {
            let marker = if m.id == current { "●" } else { " " };
            println!(
                "   {} {}. {} {}",
                marker.green(),
                (i + 1).to_string().cyan(),
                m.display_name.white(),
                format!("({})", m.id).dimmed()
            );
        }
    }

    pub fn stats(stats: ChatStats) {
        println!("   {}", "📊 Chat Statistics".bright_cyan());
        println!("      Messages: {}", stats.messages);
        println!("      Conversations: {}", stats.conversations);
    }

    pub fn settings(session: &ChatSession) {
        let s = session.settings();
        println!(
            "   {} max_length={} temperature={:.1} top_p={:.1} history={}",
            "⚙️".bright_cyan(),
            s.max_new_tokens,
            s.temperature,
            s.top_p,
            s.history_window
        );
    }

    pub fn help() {
        let commands = [
            ("/help", "show this help"),
            ("/history", "show the conversation so far"),
            ("/clear", "clear chat history"),
            ("/models", "list available models"),
            ("/model <name>", "switch model (fuzzy match)"),
            ("/test", "check the current model is reachable"),
            ("/set <key> <value>", "max_length | temperature | top_p | history"),
            ("/stats", "show chat statistics"),
            ("/quit", "leave"),
        ];
        for (cmd, desc) in commands {
            println!("   {} {}", format!("{cmd:<20}").cyan(), desc.dimmed());
        }
    }
}

/// Local wall-clock time a message was created, as `HH:MM`
pub fn sent_time(msg: &Message) -> String {
    msg.sent_at.with_timezone(&Local).format("%H:%M").to_string()
}
