/*!
 * Mock provider for testing.
 *
 * The mock reads the numbered prompts the codec renders and answers them the
 * way a real service might:
 * - `MockProvider::working()` - structured JSON answers
 * - `MockProvider::plain_numbered()` - `N. text` lines instead of JSON
 * - `MockProvider::dropping_line(n)` - numbered lines with line `n` left out of batch answers
 * - `MockProvider::failing()` - every call errors
 * - `MockProvider::intermittent(n)` - every nth call errors
 * - `MockProvider::empty()` - empty answers
 * - `MockProvider::slow(ms)` - answers after a delay
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, Provider};

static PROMPT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\. (.*)$").expect("valid prompt line regex"));

static KEYED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.*?)": "(.*)"$"#).expect("valid keyed item regex"));

const SINGLE_MARKER: &str = "Text to translate: ";
const SINGLE_END: &str = "\n\nReturn the translation";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answers with the requested JSON schema
    Working,
    /// Answers with numbered plain-text lines
    PlainNumbered,
    /// Like `PlainNumbered`, but batch answers omit one ordinal
    DropLine { line: usize },
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
    /// Answers like `Working` after a delay
    Slow { delay_ms: u64 },
}

/// What the mock understood from a prompt
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPrompt {
    /// Batch prompt with `(key, text)` items; keys are `None` for positional prompts
    Batch(Vec<(Option<String>, String)>),
    /// Single-item prompt
    Single(String),
    /// Anything else
    Unknown,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Maps a source text to its translation
    translator: fn(&str) -> String,
}

fn default_translation(text: &str) -> String {
    format!("[TRANSLATED] {}", text)
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            translator: default_translation,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn plain_numbered() -> Self {
        Self::new(MockBehavior::PlainNumbered)
    }

    /// Omit ordinal `line` (1-based) from batch answers
    pub fn dropping_line(line: usize) -> Self {
        Self::new(MockBehavior::DropLine { line })
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Use a custom source-to-translation function
    pub fn with_translator(mut self, translator: fn(&str) -> String) -> Self {
        self.translator = translator;
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copies of every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Recover the items of a prompt rendered by the codec
    pub fn parse_prompt(prompt: &str) -> ParsedPrompt {
        if let Some(start) = prompt.find(SINGLE_MARKER) {
            let rest = &prompt[start + SINGLE_MARKER.len()..];
            let text = rest.find(SINGLE_END).map_or(rest, |end| &rest[..end]);
            return ParsedPrompt::Single(text.to_string());
        }

        let items: Vec<(Option<String>, String)> = prompt
            .lines()
            .filter_map(|line| PROMPT_LINE.captures(line))
            .filter_map(|caps| caps.get(2).map(|m| m.as_str().to_string()))
            .map(|item| match KEYED_ITEM.captures(&item) {
                Some(kv) => (
                    kv.get(1).map(|m| m.as_str().to_string()),
                    kv.get(2).map_or(String::new(), |m| m.as_str().to_string()),
                ),
                None => (None, item),
            })
            .collect();

        if items.is_empty() {
            ParsedPrompt::Unknown
        } else {
            ParsedPrompt::Batch(items)
        }
    }

    fn structured_answer(&self, parsed: &ParsedPrompt) -> String {
        let translate = self.translator;
        match parsed {
            ParsedPrompt::Single(text) => json!({ "translation": translate(text) }).to_string(),
            ParsedPrompt::Batch(items) if items.iter().all(|(key, _)| key.is_some()) => {
                let entries: Vec<serde_json::Value> = items
                    .iter()
                    .map(|(key, text)| json!({ "key": key, "translation": translate(text) }))
                    .collect();
                json!({ "translations": entries }).to_string()
            }
            ParsedPrompt::Batch(items) => {
                let entries: Vec<String> = items.iter().map(|(_, text)| translate(text)).collect();
                json!({ "translations": entries }).to_string()
            }
            ParsedPrompt::Unknown => String::new(),
        }
    }

    fn numbered_answer(&self, parsed: &ParsedPrompt, skip: Option<usize>) -> String {
        let translate = self.translator;
        match parsed {
            ParsedPrompt::Single(text) => translate(text),
            ParsedPrompt::Batch(items) => items
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(i + 1) != skip)
                .map(|(i, (key, text))| match key {
                    Some(key) => format!("{}. \"{}\": \"{}\"", i + 1, key, translate(text)),
                    None => format!("{}. {}", i + 1, translate(text)),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ParsedPrompt::Unknown => String::new(),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            translator: self.translator,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let parsed = Self::parse_prompt(&request.prompt);
        self.requests.lock().push(request);

        match self.behavior {
            MockBehavior::Working => Ok(self.structured_answer(&parsed)),

            MockBehavior::PlainNumbered => Ok(self.numbered_answer(&parsed, None)),

            MockBehavior::DropLine { line } => Ok(self.numbered_answer(&parsed, Some(line))),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.structured_answer(&parsed))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.structured_answer(&parsed))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
