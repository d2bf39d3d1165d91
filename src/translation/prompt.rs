/*!
 * Prompt construction for file translation requests.
 *
 * The template carries two anchors the builder relies on: the terms section
 * header, after which the custom glossary is inserted, and the final
 * instructions marker. Model responses sometimes echo parts of the prompt
 * scaffolding back; `clean_translation` strips that echo before the result
 * is committed.
 */

/// Section header after which custom terms are inserted
const TERMS_SECTION: &str = "Use the following predefined translations for domain-specific or recurring terms. These must be used consistently throughout the translation:";

/// Marker that closes the terms section
const FINAL_INSTRUCTIONS: &str = "\nFinal Instructions:";

/// The default prompt for whole-file translation.
const FILE_TRANSLATOR: &str = r#"You are a professional literary translator translating from {source_language} to {target_language}.

Requirements:
- Translate the text faithfully, preserving tone, register, and narrative voice.
- Keep the paragraph structure and line breaks of the original.
- Do not summarize, shorten, or expand the content.
- Do not add commentary, headers, or notes of your own.

Use the following predefined translations for domain-specific or recurring terms. These must be used consistently throughout the translation:

Final Instructions:
Return only the translated text, with no preamble and no explanations.
Translation:"#;

/// Builder for file translation prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    source_language: String,
    target_language: String,
    custom_terms: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder for a language pair.
    ///
    /// Languages are display names, not ISO codes; the models follow
    /// "Spanish" far more reliably than "es".
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            custom_terms: None,
        }
    }

    /// Attach a custom-terms glossary; blank input is ignored.
    pub fn with_custom_terms(mut self, terms: &str) -> Self {
        let formatted = format_custom_terms(terms);
        if !formatted.is_empty() {
            self.custom_terms = Some(formatted);
        }
        self
    }

    /// Build the full prompt for one text segment.
    pub fn build(&self, text: &str) -> String {
        let mut prompt = FILE_TRANSLATOR
            .replace("{source_language}", &self.source_language)
            .replace("{target_language}", &self.target_language);

        if let Some(terms) = &self.custom_terms {
            if let (Some(section_start), Some(instructions_start)) =
                (prompt.find(TERMS_SECTION), prompt.find(FINAL_INSTRUCTIONS))
            {
                let terms_end = section_start + TERMS_SECTION.len();
                let before = &prompt[..terms_end];
                let after = &prompt[instructions_start..];
                prompt = format!("{}\n{}{}", before, terms, after);
            }
        }

        prompt.push_str("\n\n");
        prompt.push_str(text);
        prompt
    }
}

/// Normalize a glossary string so every term line is a `- ` bullet.
pub fn format_custom_terms(terms: &str) -> String {
    terms
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with("- ") {
                line.to_string()
            } else {
                format!("- {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip echoed prompt scaffolding from a model response.
///
/// Leading bullet lines and lines mentioning the Requirements/Translation
/// markers are dropped until the first line of actual output; everything
/// after that first line is kept verbatim.
pub fn clean_translation(text: &str) -> String {
    let mut started = false;
    let mut kept: Vec<&str> = Vec::new();

    for line in text.lines() {
        if started
            || (!line.starts_with('-')
                && !line.contains("Requirements:")
                && !line.contains("Translation:"))
        {
            started = true;
            kept.push(line);
        }
    }

    kept.join("\n").trim().to_string()
}
