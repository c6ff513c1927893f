//! Prompt assembly for the text-generation collaborators.

use lexicon::{Category, Freshness, Tone};

/// Builds the prompts sent to the LLM backend.
pub struct PromptAssembler;

fn options<T>(values: &[T], as_str: fn(&T) -> &'static str) -> String {
    values.iter().map(as_str).collect::<Vec<_>>().join(", ")
}

impl PromptAssembler {
    /// System prompt for defining an unknown term.
    pub fn define_system() -> String {
        let mut prompt = String::new();
        prompt.push_str("You are a linguist specializing in modern internet slang and Gen Z terminology.\n");
        prompt.push_str("Your task is to define the given slang term accurately and concisely.\n\n");
        prompt.push_str("Respond with a single JSON object with these fields:\n\n");
        prompt.push_str("- \"definition\": a clear and understandable definition.\n");
        prompt.push_str("- \"example\": a realistic sentence showing how the term is used naturally.\n");
        prompt.push_str(&format!(
            "- \"tone\": the most common tone associated with the term (choose one: {}).\n",
            options(&Tone::ALL, Tone::as_str)
        ));
        prompt.push_str(&format!(
            "- \"categories\": one to three relevant categories (choose from: {}).\n",
            options(&Category::ALL, Category::as_str)
        ));
        prompt.push_str(&format!(
            "- \"freshness\": your estimation of its current relevance (choose one: {}).\n",
            options(&Freshness::ALL, Freshness::as_str)
        ));
        prompt
    }

    /// User message for defining `term`.
    pub fn define_user(term: &str) -> String {
        format!("Generate the definition details.\n\nTerm: {}", term)
    }

    /// System prompt for slang to plain language.
    pub fn to_plain_system() -> String {
        "You are a translator that translates Gen Z slang to plain English. \
         Reply with the translation only."
            .to_string()
    }

    pub fn to_plain_user(slang: &str) -> String {
        format!("Translate the slang below to plain English.\n\nGen Z Slang: {}", slang)
    }

    /// System prompt for plain language to slang.
    pub fn to_slang_system() -> String {
        "You are an expert in Gen Z slang. Your task is to translate the given plain English \
         sentence into how a Gen Z person might say it. Be creative, use relevant slang, and \
         try to capture the typical tone and structure. Keep it relatively concise. \
         Reply with the translation only."
            .to_string()
    }

    pub fn to_slang_user(plain: &str) -> String {
        format!("Gen Z Slang Translation requested.\n\nPlain English: {}", plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_prompt_lists_every_option() {
        let prompt = PromptAssembler::define_system();
        for tone in Tone::ALL {
            assert!(prompt.contains(tone.as_str()));
        }
        for category in Category::ALL {
            assert!(prompt.contains(category.as_str()));
        }
        assert!(prompt.contains("cringe"));
        assert!(PromptAssembler::define_user("glizzy").ends_with("Term: glizzy"));
    }

    #[test]
    fn test_translation_prompts_carry_input_last() {
        assert!(PromptAssembler::to_plain_user("no cap").ends_with("no cap"));
        assert!(PromptAssembler::to_slang_user("that is great").ends_with("that is great"));
    }
}
