use crate::models::{Message, Role};

const JARVIS_PREAMBLE: &str = r#"You are J.A.R.V.I.S. (Just A Rather Very Intelligent System), a sophisticated AI assistant that combines the intelligence of a supercomputer with the refined manners of a British butler. You have:

- Advanced natural language processing with emotional intelligence
- Multi-domain expertise spanning technology, science, and general knowledge
- Proactive assistance with witty, dry British humor
- Professional yet personable interaction style
- Context-aware responses that adapt to user preferences
- Ethical decision-making with built-in safety constraints

Respond with sophistication, wit, and helpfulness while maintaining your distinctive personality."#;

/// Label used for user lines in rendered transcripts
pub const USER_LABEL: &str = "Human";

/// Labels providers like to open a reply with
const GENERIC_REPLY_PREFIXES: [&str; 5] = ["Assistant:", "Bot:", "AI:", "Response:", "Answer:"];

/// The assistant character every prompt is written for
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub long_name: String,
    pub preamble: String,
    /// Style hint for instruction-tuned models that only see the question
    pub instruction_style: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self::jarvis()
    }
}

impl Persona {
    pub fn jarvis() -> Self {
        Self {
            name: "J.A.R.V.I.S.".to_string(),
            long_name: "Just A Rather Very Intelligent System".to_string(),
            preamble: JARVIS_PREAMBLE.to_string(),
            instruction_style: "a sophisticated British AI assistant".to_string(),
        }
    }

    fn label(&self, role: Role) -> &str {
        match role {
            Role::User => USER_LABEL,
            Role::Assistant => &self.name,
        }
    }

    /// Preamble, prior messages, the pending question, then the cue for the
    /// assistant's turn.
    pub fn render_transcript(&self, history: &[Message], pending_user: &str) -> String {
        let mut prompt = String::with_capacity(self.preamble.len() + pending_user.len() + 64);
        prompt.push_str(&self.preamble);
        prompt.push_str("\n\n");
        for msg in history {
            prompt.push_str(self.label(msg.role));
            prompt.push_str(": ");
            prompt.push_str(&msg.content);
            prompt.push('\n');
        }
        prompt.push_str(USER_LABEL);
        prompt.push_str(": ");
        prompt.push_str(pending_user);
        prompt.push('\n');
        prompt.push_str(&self.name);
        prompt.push(':');
        prompt
    }

    pub fn instruction_prompt(&self, question: &str) -> String {
        format!(
            "Answer this question in the style of {}: {question}",
            self.instruction_style
        )
    }

    /// Stop sequences matching the role prefixes used in transcripts
    pub fn stop_sequences(&self) -> Vec<String> {
        vec![
            format!("{USER_LABEL}:"),
            format!("{}:", self.name),
            format!("\n\n{USER_LABEL}:"),
            format!("\n\n{}:", self.name),
        ]
    }

    /// Leading labels stripped from replies, persona first
    pub fn reply_prefixes(&self) -> Vec<String> {
        std::iter::once(format!("{}:", self.name))
            .chain(GENERIC_REPLY_PREFIXES.iter().map(|p| p.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript_layout() {
        let persona = Persona::jarvis();
        let history = vec![Message::user("Hello"), Message::assistant("Good evening, sir.")];
        let prompt = persona.render_transcript(&history, "What time is it?");

        assert!(prompt.starts_with(&persona.preamble));
        assert!(prompt.contains("\n\nHuman: Hello\nJ.A.R.V.I.S.: Good evening, sir.\n"));
        assert!(prompt.ends_with("Human: What time is it?\nJ.A.R.V.I.S.:"));
    }

    #[test]
    fn test_render_transcript_without_history() {
        let persona = Persona::jarvis();
        let prompt = persona.render_transcript(&[], "Hi");
        assert_eq!(prompt, format!("{}\n\nHuman: Hi\nJ.A.R.V.I.S.:", persona.preamble));
    }

    #[test]
    fn test_stop_sequences_match_labels() {
        let stops = Persona::jarvis().stop_sequences();
        assert_eq!(
            stops,
            vec!["Human:", "J.A.R.V.I.S.:", "\n\nHuman:", "\n\nJ.A.R.V.I.S.:"]
        );
    }

    #[test]
    fn test_reply_prefixes_lead_with_persona() {
        let prefixes = Persona::jarvis().reply_prefixes();
        assert_eq!(prefixes[0], "J.A.R.V.I.S.:");
        assert!(prefixes.iter().any(|p| p == "Bot:"));
        assert_eq!(prefixes.len(), 6);
    }
}
