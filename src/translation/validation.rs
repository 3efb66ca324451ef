/*!
 * Completeness check for batch responses.
 */

use std::collections::BTreeSet;

use super::types::TranslationResult;

/// Outcome of checking a batch for under-production
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    /// True when every distinct input was answered
    pub is_valid: bool,
    /// Inputs the service left out, in lexicographic order
    pub missing_inputs: Vec<String>,
}

impl ValidationReport {
    pub fn missing_count(&self) -> usize {
        self.missing_inputs.len()
    }
}

/// Report every distinct input text that no answered result covers
///
/// Results flagged as omitted by the decoder do not count as answers.
/// Extra or duplicate results are not an error.
pub fn validate<S: AsRef<str>>(inputs: &[S], results: &[TranslationResult]) -> ValidationReport {
    let expected: BTreeSet<&str> = inputs.iter().map(AsRef::as_ref).collect();
    let answered: BTreeSet<&str> = results
        .iter()
        .filter(|r| r.is_answered())
        .map(|r| r.input.as_str())
        .collect();

    let missing_inputs: Vec<String> = expected
        .difference(&answered)
        .map(|s| s.to_string())
        .collect();

    ValidationReport {
        is_valid: missing_inputs.is_empty(),
        missing_inputs,
    }
}
