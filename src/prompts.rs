//! Prompt template registry
//!
//! Every endpoint renders its instructions from a registered template.
//! Templates are versioned and carry a SHA-1 checksum of their content so a
//! running instance can report exactly which prompt text produced a given
//! response. Static assets (writing criteria, examples, audiobook prompts)
//! are read from the prompt directory once at startup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::EngineError;

pub const TRANSLATION: &str = "translation-v1";
pub const CORRECTION: &str = "correction-v1";
pub const CHATBOT_SYSTEM: &str = "chatbot-system-v1";
pub const TTS_NARRATION: &str = "tts-narration-v1";
pub const AUDIOBOOK_REWRITE: &str = "audiobook-rewrite-v1";
pub const AUDIOBOOK_NARRATION: &str = "audiobook-narration-v1";

/// Core prompt definition
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable identifier (format: name-v1)
    pub id: String,
    /// Short one-liner description
    pub one_liner: String,
    /// Template text with {{placeholder}} slots
    pub template: String,
    pub version: String,
    /// SHA-1 checksum of the template content
    pub checksum: String,
}

impl Prompt {
    pub fn new(
        id: impl Into<String>,
        one_liner: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let template = template.into();
        let checksum = sha1_checksum(&template);
        Self {
            id: id.into(),
            one_liner: one_liner.into(),
            template,
            version: "1.0.0".to_string(),
            checksum,
        }
    }

    /// Substitute `{{key}}` slots with the given values.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.template.clone();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        out
    }
}

/// Generate a SHA-1 checksum of prompt content
fn sha1_checksum(content: &str) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Registry of all known prompts with their metadata
#[derive(Debug, Default)]
pub struct PromptRegistry {
    prompts: HashMap<String, Arc<Prompt>>,
}

impl PromptRegistry {
    /// Build the registry, reading file-backed assets from `prompt_dir`.
    pub fn load(prompt_dir: &Path) -> Result<Self, EngineError> {
        let criteria = read_asset(prompt_dir, "writing_criteria.txt")?;
        let examples = read_asset(prompt_dir, "writing_examples.txt")?;
        let audiobook_rewrite = read_asset(prompt_dir, "audiobook_rewrite.txt")?;
        let audiobook_narration = read_asset(prompt_dir, "audiobook_narration.txt")?;

        let mut registry = Self::default();
        registry.register_core_prompts(&criteria, &examples);
        registry.register(Prompt::new(
            AUDIOBOOK_REWRITE,
            "Rewrite source text into narration-ready prose",
            audiobook_rewrite,
        ));
        registry.register(Prompt::new(
            AUDIOBOOK_NARRATION,
            "Voice direction for audiobook narration",
            audiobook_narration,
        ));

        for prompt in registry.list() {
            tracing::debug!(
                "registered prompt {} (checksum {})",
                prompt.id,
                &prompt.checksum[..8]
            );
        }

        Ok(registry)
    }

    /// Add a prompt to the registry
    pub fn register(&mut self, prompt: Prompt) {
        self.prompts.insert(prompt.id.clone(), Arc::new(prompt));
    }

    /// Get a prompt by ID
    pub fn get(&self, id: &str) -> Option<Arc<Prompt>> {
        self.prompts.get(id).cloned()
    }

    /// Render a registered prompt with the given substitutions.
    pub fn render(&self, id: &str, vars: &[(&str, &str)]) -> Result<String, EngineError> {
        let prompt = self.get(id).ok_or_else(|| EngineError::Internal {
            message: format!("unknown prompt id: {id}"),
        })?;
        Ok(prompt.render(vars))
    }

    /// List all prompts
    pub fn list(&self) -> Vec<Arc<Prompt>> {
        self.prompts.values().cloned().collect()
    }

    fn register_core_prompts(&mut self, criteria: &str, examples: &str) {
        self.register(Prompt::new(
            TRANSLATION,
            "Translate user text and describe it briefly",
            r#"You are a translation assistant. Your ONLY task is to translate the user's text to {{target_language}}.
Do NOT answer, explain, or comment on the text. If the input is a question, ONLY translate the question, never answer it.
Return the translation in JSON format with these keys: { "translation": "string", "info": "string" }.
"info" is a one-sentence description of the translated text, written in {{target_language}}.
Do NOT return the original text, any answers, or any extra information.

##EXAMPLES##
input: "How are you?"
output: { "translation": "كيف حالك؟", "info": "سؤال شائع للتحية." }

input: "I love programming."
output: { "translation": "أحب البرمجة.", "info": "جملة تعبر عن حب البرمجة." }"#,
        ));

        // Static criteria and examples are baked in once; only the question
        // remains a render-time slot
        let correction_template = format!(
            r#"You are a professional writing correction assistant.
You should be strict with the evaluation.
Your task is to evaluate a user's written response based on:

The given question:
{{{{question}}}}

The evaluation criteria:
{criteria}

##Scoring##

Evaluate the response across five criteria:
- Task Achievement
- Coherence and Cohesion
- Lexical Resource
- Grammatical Range and Accuracy
- Spelling, Punctuation, and Mechanics

Each criterion must be scored with 0, 1, 3, or 5.
Sum the scores to produce a total out of 25.

##Output Format##

Return the result in JSON with exactly these keys:
{{
"score": "int",
"feedback": "string"
}}

##Feedback Instructions##

- Feedback must be concise, constructive, and supportive.
- Address each criterion specifically with strengths and suggestions for improvement.
- Point out specific mistakes and show how to correct them.
- If a criterion does not apply, do not penalize the user.
- Do not restate the question or answer, explain the criteria, or add extra commentary.

##Example##
{examples}"#
        );
        self.register(Prompt::new(
            CORRECTION,
            "Score a writing sample against the marking criteria",
            correction_template,
        ));

        self.register(Prompt::new(
            CHATBOT_SYSTEM,
            "System prompt for the English-learning tutor chat",
            r#"You are a friendly, professional, helpful assistant that guides students in learning English.
You are an expert in English education. You only answer questions related to learning English.
If the user wants to translate something, translate it and give a brief explanation.
If the user sends a single word, give the meaning of that word in English and Arabic.
If the user asks something unrelated, reply with: "I can only answer questions about learning English."
Correct any typos the user makes.
You're talking to kids or teenagers."#,
        ));

        self.register(Prompt::new(
            TTS_NARRATION,
            "Voice direction for plain text-to-speech",
            "Please read the text in a clear and engaging manner. Use a friendly tone and emphasize key points.",
        ));
    }
}

fn read_asset(dir: &Path, name: &str) -> Result<String, EngineError> {
    let path = dir.join(name);
    std::fs::read_to_string(&path).map_err(|e| EngineError::Config {
        message: format!("failed to read prompt asset {}: {e}", path.display()),
    })
}
