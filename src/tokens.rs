//! Token counting for prompt accounting
//!
//! Endpoint responses report how many tokens a request consumed, summing the
//! user input and the model output.

use tiktoken_rs::{CoreBPE, get_bpe_from_model};

/// Resolve the BPE encoder for a model, falling back to gpt-4o-mini.
fn encoder_for(model: &str) -> CoreBPE {
    if let Ok(bpe) = get_bpe_from_model(model) {
        return bpe;
    }

    // Newer model names lag behind the encoder table; fall back through the
    // closest known family
    let model_lower = model.to_lowercase();
    if (model_lower.starts_with("gpt-5") || model_lower.starts_with("gpt-4.1"))
        && let Ok(bpe) = get_bpe_from_model("gpt-4o")
    {
        return bpe;
    }
    get_bpe_from_model("gpt-4o-mini").expect("gpt-4o-mini encoding should always resolve")
}

/// Count how many tokens a single text would consume for the given model.
pub fn count_tokens(text: &str, model: &str) -> usize {
    encoder_for(model).encode_with_special_tokens(text).len()
}

/// Count tokens for each text, reusing one encoder. Counts are in input order.
pub fn count_tokens_batch<'a, I>(texts: I, model: &str) -> Vec<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let encoder = encoder_for(model);
    texts
        .into_iter()
        .map(|text| encoder.encode_with_special_tokens(text).len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_nonzero_for_real_text() {
        assert!(count_tokens("Hello, world!", "gpt-4o") > 0);
    }

    #[test]
    fn unknown_models_fall_back_to_a_known_encoding() {
        let exact = count_tokens("the quick brown fox", "gpt-4o");
        let fallback = count_tokens("the quick brown fox", "gpt-5-nano");
        assert_eq!(exact, fallback);
    }

    #[test]
    fn batch_counts_preserve_order() {
        let counts = count_tokens_batch(["one", "a longer sentence than one"], "gpt-4o-mini");
        assert_eq!(counts.len(), 2);
        assert!(counts[1] > counts[0]);
    }
}
