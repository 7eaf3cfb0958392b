use crate::conversation::Conversation;
use crate::models::{GenerationParameters, GenerationPayload, GenerationSettings};
use crate::persona::Persona;

/// How a hosted model expects to be prompted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Instruction-tuned seq2seq models; single question, no history
    Instruction,
    /// Causal chat models fed the whole rendered transcript
    Dialogue,
}

impl ModelFamily {
    pub fn for_model(model_id: &str) -> Self {
        if model_id.to_lowercase().contains("flan-t5") {
            ModelFamily::Instruction
        } else {
            ModelFamily::Dialogue
        }
    }

    pub fn build_payload(
        self,
        persona: &Persona,
        conversation: &Conversation,
        question: &str,
        settings: &GenerationSettings,
    ) -> GenerationPayload {
        match self {
            ModelFamily::Instruction => GenerationPayload {
                inputs: persona.instruction_prompt(question),
                parameters: GenerationParameters {
                    max_new_tokens: settings.max_new_tokens,
                    temperature: settings.temperature,
                    top_p: None,
                    do_sample: true,
                    return_full_text: None,
                    stop: None,
                },
            },
            ModelFamily::Dialogue => GenerationPayload {
                inputs: persona
                    .render_transcript(conversation.recent(settings.history_window), question),
                parameters: GenerationParameters {
                    max_new_tokens: settings.max_new_tokens,
                    temperature: settings.temperature,
                    top_p: Some(settings.top_p),
                    do_sample: true,
                    return_full_text: Some(false),
                    stop: Some(persona.stop_sequences()),
                },
            },
        }
    }
}
