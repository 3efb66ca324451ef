/*!
 * Translation engine for Minecraft mod texts.
 *
 * This module turns a key to text mapping into a translated mapping. It is
 * split into several submodules:
 *
 * - `similarity`: Edit-distance similarity between texts
 * - `dictionary`: Persistent term dictionary and similar-example lookup
 * - `codec`: Prompt rendering and two-tier response decoding
 * - `validation`: Detection of items a batch response left out
 * - `batch`: The coordinator driving a whole translation run
 * - `rate_limit`: Token-bucket pacing of service calls
 * - `progress`: Progress reporting
 */

// Re-export main types for easier usage
pub use self::batch::{BatchCoordinator, TranslationOptions};
pub use self::codec::{PromptShape, ResponseCodec, ResponseDecoder};
pub use self::dictionary::{DictionaryStore, SimilarityMatch, TermDictionary, TranslationExample};
pub use self::progress::{NoProgress, ProgressSink, ProgressUpdate};
pub use self::rate_limit::RateLimiter;
pub use self::similarity::SimilarityMatcher;
pub use self::types::{TranslationData, TranslationResult, TranslationUnit};
pub use self::validation::{ValidationReport, validate};

// Submodules
pub mod batch;
pub mod codec;
pub mod dictionary;
pub mod progress;
pub mod rate_limit;
pub mod similarity;
pub mod types;
pub mod validation;
