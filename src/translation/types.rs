/*!
 * Value types shared by the translation engine.
 */

use std::collections::BTreeMap;

use crate::errors::ItemError;

/// Key to text mapping consumed and produced by a translation run
///
/// Ordered so that runs over the same input visit keys in the same order.
pub type TranslationData = BTreeMap<String, String>;

/// One piece of translatable text identified by a logical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub key: String,
    pub source_text: String,
}

impl TranslationUnit {
    pub fn new(key: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source_text: source_text.into(),
        }
    }
}

/// Outcome of translating one unit
///
/// An invalid result always carries its input as output, so callers can use
/// `output` unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub input: String,
    pub output: String,
    pub is_valid: bool,
    pub error: Option<ItemError>,
}

impl TranslationResult {
    /// Result for a value the service returned
    ///
    /// Valid only when the value is non-empty and differs from the input.
    pub fn from_output(input: &str, output: &str) -> Self {
        if output.is_empty() {
            return Self::failed(input, ItemError::EmptyTranslation);
        }

        let is_valid = output != input;
        Self {
            input: input.to_string(),
            output: if is_valid { output.to_string() } else { input.to_string() },
            is_valid,
            error: None,
        }
    }

    /// Result for an item that received no translation
    pub fn failed(input: &str, error: ItemError) -> Self {
        Self {
            input: input.to_string(),
            output: input.to_string(),
            is_valid: false,
            error: Some(error),
        }
    }

    /// Whether the service answered this item at all
    pub fn is_answered(&self) -> bool {
        !self.error.as_ref().is_some_and(ItemError::is_omission)
    }
}
