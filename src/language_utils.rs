use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Language utilities for the supported translation languages
///
/// The translation backends are only exercised against a fixed set of
/// languages; this module owns that table and the code matching helpers
/// used when validating batch parameters.
/// ISO 639-1 codes of the languages the translation service accepts
pub const SUPPORTED_LANGUAGE_CODES: [&str; 5] = ["de", "en", "es", "fr", "it"];

static SUPPORTED_LANGUAGES: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    SUPPORTED_LANGUAGE_CODES
        .iter()
        .map(|code| {
            let language = Language::from_639_1(code)
                .expect("supported language table only holds valid ISO 639-1 codes");
            (code.to_string(), language.to_name().to_string())
        })
        .collect()
});

/// Mapping of supported language codes to English display names
pub fn supported_languages() -> BTreeMap<String, String> {
    SUPPORTED_LANGUAGES.clone()
}

/// Check whether a language code is in the supported table
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains_key(&code.trim().to_lowercase())
}

/// English display name of a supported language code
pub fn display_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .get(&normalized)
        .cloned()
        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))
}

/// Resolve a 2- or 3-letter ISO 639 code to a language
fn to_language(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    matches!(
        (to_language(code1), to_language(code2)),
        (Some(first), Some(second)) if first == second
    )
}
