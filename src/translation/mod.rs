/*!
 * Translation service built on top of the provider clients.
 *
 * This module turns raw provider completions into file-level translations.
 * It is split into several submodules:
 *
 * - `service`: The `Translator` capability and its provider-routing implementation
 * - `prompt`: Prompt template rendering, custom-terms insertion, response cleanup
 * - `segment`: Character-budget segmentation of long texts
 */

// Re-export main types for easier usage
pub use self::prompt::PromptBuilder;
pub use self::service::{TranslateRequest, TranslationService, Translator};

// Submodules
pub mod prompt;
pub mod segment;
pub mod service;
