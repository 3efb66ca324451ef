/*!
 * # modlocalizer - Minecraft mod localization with AI
 *
 * A Rust library for translating Minecraft mod texts using AI.
 *
 * ## Features
 *
 * - Translate language files (`.json`, `.lang`) and BetterQuesting quest files
 * - Reuse earlier translations through a persistent term dictionary
 * - Offer similar earlier translations to the service as examples
 * - Batch requests, with omitted items retried one at a time
 * - Rate limited, bounded-concurrency calls to any OpenAI-compatible API
 * - Minecraft locale codes, including the pre-1.11 `ja_JP` style
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation engine:
 *   - `translation::batch`: The coordinator driving a run
 *   - `translation::dictionary`: Term dictionary and similar-example lookup
 *   - `translation::codec`: Prompt rendering and response decoding
 * - `quests`: BetterQuesting documents in either key dialect
 * - `lang_file`: Plain translation file readers and writers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Minecraft locale utilities
 * - `providers`: Translation service clients
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod lang_file;
pub mod language_utils;
pub mod providers;
pub mod quests;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ConfigError, ItemError, ProviderError};
pub use quests::QuestDocument;
pub use translation::{BatchCoordinator, DictionaryStore, TermDictionary, TranslationData, TranslationOptions};
