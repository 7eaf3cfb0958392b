use crate::error::{ChatError, Result};
use crate::models::GenerationSettings;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    Help,
    History,
    Clear,
    Models,
    Model(String),
    Test,
    Set { key: String, value: String },
    Stats,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name.to_lowercase().as_str() {
            "help" | "h" | "?" => Command::Help,
            "history" => Command::History,
            "clear" => Command::Clear,
            "models" => Command::Models,
            "model" if !arg.is_empty() => Command::Model(arg.to_string()),
            "model" => Command::Models,
            "test" => Command::Test,
            "set" => match arg.split_once(char::is_whitespace) {
                Some((key, value)) => Command::Set {
                    key: key.to_lowercase(),
                    value: value.trim().to_string(),
                },
                None => Command::Unknown(line.to_string()),
            },
            "stats" => Command::Stats,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ChatError::Config(format!("Invalid value '{value}' for {key}")))
}

/// Settings with one knob changed. Range checks happen in the session.
pub fn apply_setting(
    current: GenerationSettings,
    key: &str,
    value: &str,
) -> Result<GenerationSettings> {
    let mut next = current;
    match key {
        "max_length" | "max_new_tokens" | "length" => {
            next.max_new_tokens = parse_value(key, value)?
        }
        "temperature" | "temp" => next.temperature = parse_value(key, value)?,
        "top_p" | "top-p" => next.top_p = parse_value(key, value)?,
        "history" | "history_window" => next.history_window = parse_value(key, value)?,
        other => {
            return Err(ChatError::Config(format!(
                "Unknown setting '{other}'. Try max_length, temperature, top_p or history"
            )));
        }
    }
    Ok(next)
}
