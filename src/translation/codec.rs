/*!
 * Prompt encoding and response decoding.
 *
 * A batch is rendered as a numbered list in one of two shapes:
 *
 * - Keyed: `1. "item.sword": "Iron Sword"`; the service answers with
 *   `{ "translations": [ { "key", "translation" } ] }`.
 * - Positional: `1. Iron Sword`; the service answers with
 *   `{ "translations": [ "..." ] }` in request order.
 *
 * A bare array without the `translations` wrapper is accepted as well.
 *
 * The service does not always honour the requested schema, so decoding runs
 * a strict structured decoder first and falls back to scanning numbered
 * lines. Every input position always yields exactly one result.
 */

use std::collections::HashMap;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::errors::ItemError;
use crate::language_utils;
use crate::providers::{CompletionRequest, OutputSchema};
use super::dictionary::SimilarityMatch;
use super::types::{TranslationResult, TranslationUnit};

/// Name sent with every output schema
pub const SCHEMA_NAME: &str = "translation_response";

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\.\s*(.*)$").expect("valid numbered line regex")
});

static QUOTED_KEY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"(?:[^"\\]|\\.)*"\s*:\s*(.*)$"#).expect("valid quoted key regex")
});

/// How units are rendered into a batch prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptShape {
    /// Each line carries the logical key and the text
    #[default]
    Keyed,
    /// Each line carries only the text
    Positional,
}

/// Strategy for turning a raw batch response into per-item results
pub trait ResponseDecoder {
    /// Decode the response, or `None` if this decoder does not recognise it
    fn decode(
        &self,
        units: &[TranslationUnit],
        shape: PromptShape,
        response: &str,
    ) -> Option<Vec<TranslationResult>>;
}

/// Decodes schema-conforming JSON payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDecoder;

/// Decodes `N. text` lines by their ordinal prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScanDecoder;

/// Batch reply, wrapped in `{"translations": [...]}` or as a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchReply<T> {
    Wrapped { translations: Vec<T> },
    Bare(Vec<T>),
}

impl<T> BatchReply<T> {
    fn into_translations(self) -> Vec<T> {
        match self {
            Self::Wrapped { translations } | Self::Bare(translations) => translations,
        }
    }
}

#[derive(Debug, Deserialize)]
struct KeyedEntry {
    key: String,
    translation: String,
}

#[derive(Debug, Deserialize)]
struct SingleTranslation {
    translation: String,
}

impl ResponseDecoder for StructuredDecoder {
    fn decode(
        &self,
        units: &[TranslationUnit],
        shape: PromptShape,
        response: &str,
    ) -> Option<Vec<TranslationResult>> {
        let payload = strip_code_fence(response);

        match shape {
            PromptShape::Keyed => {
                let translations = serde_json::from_str::<BatchReply<KeyedEntry>>(payload)
                    .map_err(|e| debug!("Structured keyed decode failed: {}", e))
                    .ok()?
                    .into_translations();

                let by_key: HashMap<&str, &str> = translations
                    .iter()
                    .map(|entry| (entry.key.as_str(), entry.translation.as_str()))
                    .collect();

                Some(
                    units
                        .iter()
                        .map(|unit| match by_key.get(unit.key.as_str()) {
                            Some(translation) => TranslationResult::from_output(
                                &unit.source_text,
                                &unescape_newlines(&unit.source_text, translation),
                            ),
                            None => TranslationResult::failed(&unit.source_text, ItemError::MissingTranslation),
                        })
                        .collect(),
                )
            }
            PromptShape::Positional => {
                let translations = serde_json::from_str::<BatchReply<String>>(payload)
                    .map_err(|e| debug!("Structured positional decode failed: {}", e))
                    .ok()?
                    .into_translations();

                // More answers than questions means the order cannot be trusted
                if translations.is_empty() || translations.len() > units.len() {
                    debug!(
                        "Structured positional response has {} entries for {} inputs",
                        translations.len(),
                        units.len()
                    );
                    return None;
                }

                Some(
                    units
                        .iter()
                        .enumerate()
                        .map(|(i, unit)| match translations.get(i) {
                            Some(translation) => TranslationResult::from_output(
                                &unit.source_text,
                                &unescape_newlines(&unit.source_text, translation),
                            ),
                            None => TranslationResult::failed(&unit.source_text, ItemError::MissingTranslation),
                        })
                        .collect(),
                )
            }
        }
    }
}

impl ResponseDecoder for LineScanDecoder {
    fn decode(
        &self,
        units: &[TranslationUnit],
        shape: PromptShape,
        response: &str,
    ) -> Option<Vec<TranslationResult>> {
        let mut lines: HashMap<usize, &str> = HashMap::new();
        for line in response.lines() {
            if let Some(caps) = NUMBERED_LINE.captures(line) {
                let ordinal = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
                let content = caps.get(2).map_or("", |m| m.as_str().trim());
                if let Some(ordinal) = ordinal {
                    lines.entry(ordinal).or_insert(content);
                }
            }
        }

        Some(
            units
                .iter()
                .enumerate()
                .map(|(i, unit)| {
                    let Some(&content) = lines.get(&(i + 1)) else {
                        return TranslationResult::failed(&unit.source_text, ItemError::MissingTranslation);
                    };

                    let value = match shape {
                        PromptShape::Keyed => strip_echoed_key(content),
                        PromptShape::Positional => content,
                    };
                    let value = unescape_newlines(&unit.source_text, strip_quotes(value.trim()));

                    if value.is_empty() {
                        TranslationResult::failed(&unit.source_text, ItemError::UnparsableTranslation)
                    } else {
                        TranslationResult::from_output(&unit.source_text, &value)
                    }
                })
                .collect(),
        )
    }
}

/// Builds requests for the translation service and decodes its replies
#[derive(Debug, Clone)]
pub struct ResponseCodec {
    target_language: String,
    language_name: String,
}

impl ResponseCodec {
    /// Create a codec for one target language code
    pub fn new(target_language: impl Into<String>) -> Self {
        let target_language = target_language.into();
        let language_name = language_utils::language_name_for_prompt(&target_language);
        Self {
            target_language,
            language_name,
        }
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Render a batch of units as one request
    pub fn encode_batch(&self, units: &[TranslationUnit], shape: PromptShape) -> CompletionRequest {
        let mut list = String::new();
        let prompt = match shape {
            PromptShape::Keyed => {
                for (i, unit) in units.iter().enumerate() {
                    list.push_str(&format!(
                        "{}. \"{}\": \"{}\"\n",
                        i + 1,
                        unit.key,
                        escape_newlines(&unit.source_text)
                    ));
                }
                format!(
                    "Translate the following Minecraft mod key-value pairs from English to {}. \
                     Keep translations natural and appropriate for gaming context. \
                     Only translate the VALUES (after the colon), keep the KEYS unchanged.\n\n\
                     {}\n\
                     Return a JSON object whose 'translations' field is an array of objects with 'key' and 'translation' fields.",
                    self.language_name, list
                )
            }
            PromptShape::Positional => {
                for (i, unit) in units.iter().enumerate() {
                    list.push_str(&format!("{}. {}\n", i + 1, escape_newlines(&unit.source_text)));
                }
                format!(
                    "Translate the following Minecraft mod texts from English to {}. \
                     Keep translations natural and appropriate for gaming context.\n\n\
                     {}\n\
                     Return a JSON object whose 'translations' field is an array of the translated strings in the same order.",
                    self.language_name, list
                )
            }
        };

        debug!("Batch translation prompt for {} texts", units.len());
        trace!("{}", prompt);

        CompletionRequest::new(prompt).with_schema(batch_schema(shape))
    }

    /// Decode a batch reply, one result per unit in request order
    pub fn decode_batch(
        &self,
        units: &[TranslationUnit],
        shape: PromptShape,
        response: &str,
    ) -> Vec<TranslationResult> {
        let decoders: [&dyn ResponseDecoder; 2] = [&StructuredDecoder, &LineScanDecoder];

        decoders
            .iter()
            .find_map(|decoder| decoder.decode(units, shape, response))
            .unwrap_or_else(|| {
                units
                    .iter()
                    .map(|unit| TranslationResult::failed(&unit.source_text, ItemError::MissingTranslation))
                    .collect()
            })
    }

    /// Render a single-item request, optionally with prior translations as examples
    pub fn encode_single(&self, text: &str, examples: &[SimilarityMatch]) -> CompletionRequest {
        let mut prompt = format!(
            "Translate the following Minecraft mod text from English to {}. \
             Keep the translation natural and appropriate for gaming context.",
            self.language_name
        );

        if !examples.is_empty() {
            prompt.push_str("\n\nHere are some similar translation examples for reference:\n");
            for m in examples {
                prompt.push_str(&format!(
                    "- \"{}\" → \"{}\" (similarity: {:.1}%)\n",
                    m.example.original,
                    m.example.translation,
                    m.score * 100.0
                ));
            }
            prompt.push_str("\nPlease maintain consistency with these examples when translating.");
        }

        prompt.push_str(&format!(
            "\n\nText to translate: {}\n\nReturn the translation as a JSON object with a 'translation' field.",
            text
        ));

        trace!("Single translation prompt:\n{}", prompt);
        CompletionRequest::new(prompt).with_schema(single_schema())
    }

    /// Decode a single-item reply
    ///
    /// Replies that are not the expected JSON are taken verbatim.
    pub fn decode_single(&self, text: &str, response: &str) -> TranslationResult {
        let payload = strip_code_fence(response);

        match serde_json::from_str::<SingleTranslation>(payload) {
            Ok(single) => TranslationResult::from_output(text, &single.translation),
            Err(e) => {
                debug!("Structured single decode failed, using raw response: {}", e);
                TranslationResult::from_output(text, response.trim())
            }
        }
    }
}

/// Output schema for a batch request
pub fn batch_schema(shape: PromptShape) -> OutputSchema {
    let items = match shape {
        PromptShape::Keyed => json!({
            "type": "object",
            "properties": {
                "key": { "type": "string" },
                "translation": { "type": "string" }
            },
            "required": ["key", "translation"],
            "additionalProperties": false
        }),
        PromptShape::Positional => json!({ "type": "string" }),
    };

    OutputSchema {
        name: SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "translations": { "type": "array", "items": items }
            },
            "required": ["translations"],
            "additionalProperties": false
        }),
    }
}

/// Output schema for a single-item request
pub fn single_schema() -> OutputSchema {
    OutputSchema {
        name: SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "translation": { "type": "string" }
            },
            "required": ["translation"],
            "additionalProperties": false
        }),
    }
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the info string (```json)
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Drop an echoed `"key":` or `key:` prefix from a keyed line
fn strip_echoed_key(content: &str) -> &str {
    if let Some(caps) = QUOTED_KEY_PREFIX.captures(content) {
        return caps.get(1).map_or("", |m| m.as_str());
    }

    match content.find(':') {
        Some(idx) if idx > 0 => &content[idx + 1..],
        _ => content,
    }
}

/// Remove one layer of surrounding double quotes
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Undo prompt escaping, only for sources that actually had line breaks
fn unescape_newlines(source: &str, value: &str) -> String {
    if source.contains('\n') {
        value.replace("\\n", "\n")
    } else {
        value.to_string()
    }
}
