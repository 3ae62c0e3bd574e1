//! Registry loading and rendering against the shipped prompt assets

use lingodesk::prompts::{self, PromptRegistry};
use std::path::Path;

fn registry() -> PromptRegistry {
    PromptRegistry::load(Path::new("config")).expect("shipped prompt assets should load")
}

#[test]
fn all_core_prompts_are_registered() {
    let registry = registry();
    for id in [
        prompts::TRANSLATION,
        prompts::CORRECTION,
        prompts::CHATBOT_SYSTEM,
        prompts::TTS_NARRATION,
        prompts::AUDIOBOOK_REWRITE,
        prompts::AUDIOBOOK_NARRATION,
    ] {
        let prompt = registry.get(id).unwrap_or_else(|| panic!("{id} missing"));
        assert_eq!(prompt.checksum.len(), 40, "{id} has no checksum");
        assert!(!prompt.one_liner.is_empty());
    }
}

#[test]
fn translation_prompt_substitutes_the_target_language() {
    let rendered = registry()
        .render(prompts::TRANSLATION, &[("target_language", "Arabic")])
        .unwrap();
    assert!(rendered.contains("translate the user's text to Arabic"));
    assert!(!rendered.contains("{{target_language}}"));
}

#[test]
fn correction_prompt_bakes_criteria_and_takes_the_question() {
    let rendered = registry()
        .render(prompts::CORRECTION, &[("question", "Describe your last holiday.")])
        .unwrap();
    assert!(rendered.contains("Describe your last holiday."));
    // Criteria and examples come from the asset files at load time
    assert!(rendered.contains("Task Achievement"));
    assert!(rendered.contains("score:"));
    assert!(!rendered.contains("{{question}}"));
    assert!(!rendered.contains("{{criteria}}"));
}

#[test]
fn missing_asset_directory_is_a_config_error() {
    let result = PromptRegistry::load(Path::new("no_such_prompt_dir"));
    assert!(result.is_err());
}
