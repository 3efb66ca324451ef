/*!
 * Batch translation coordination.
 *
 * The coordinator turns a key to text mapping into a translated mapping:
 * exact dictionary hits are reused, the remaining texts are deduplicated and
 * sent to the translation service either in chunks or one at a time, items
 * the service silently dropped are retried individually, and every accepted
 * translation is written back to the term dictionary.
 *
 * Whatever happens, the returned mapping has exactly the input's keys; items
 * that could not be translated keep their source text.
 */

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::errors::{ItemError, ProviderError};
use crate::providers::{CompletionRequest, Provider};
use super::codec::{PromptShape, ResponseCodec};
use super::dictionary::DictionaryStore;
use super::progress::{ProgressSink, ProgressTracker};
use super::rate_limit::RateLimiter;
use super::types::{TranslationData, TranslationResult, TranslationUnit};
use super::validation;

/// Options for one translation run
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Target language code
    pub target_language: String,
    /// Minimum similarity for a dictionary entry to be offered as an example
    pub similarity_threshold: f64,
    /// Units per request; 1 or less selects the single-item path
    pub batch_size: usize,
    /// Maximum number of examples in a single-item prompt
    pub max_examples: usize,
    /// Requests in flight at once
    pub max_concurrent_requests: usize,
    /// Upper bound for one service call
    pub request_timeout: Duration,
    /// How batch prompts render their units
    pub prompt_shape: PromptShape,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            target_language: "ja_jp".to_string(),
            similarity_threshold: 0.6,
            batch_size: 1,
            max_examples: 3,
            max_concurrent_requests: 1,
            request_timeout: Duration::from_secs(120),
            prompt_shape: PromptShape::Keyed,
        }
    }
}

/// A distinct source text awaiting translation and the keys that share it
#[derive(Debug)]
struct PendingText {
    unit: TranslationUnit,
    keys: Vec<String>,
}

/// Drives the translation of a whole key to text mapping
#[derive(Debug)]
pub struct BatchCoordinator {
    provider: Arc<dyn Provider>,
    store: Arc<DictionaryStore>,
    codec: ResponseCodec,
    options: TranslationOptions,
    limiter: Option<RateLimiter>,
}

impl BatchCoordinator {
    pub fn new(provider: Arc<dyn Provider>, store: Arc<DictionaryStore>, options: TranslationOptions) -> Self {
        Self {
            provider,
            store,
            codec: ResponseCodec::new(options.target_language.clone()),
            options,
            limiter: None,
        }
    }

    /// Pace every service call through a rate limiter
    pub fn with_rate_limiter(mut self, limiter: Option<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    /// Translate every value of `data`
    ///
    /// Never fails: service errors are logged and the affected values pass
    /// through unchanged.
    pub async fn translate(&self, data: &TranslationData, progress: &dyn ProgressSink) -> TranslationData {
        let language = self.options.target_language.as_str();
        self.store.load();

        let tracker = ProgressTracker::new(data.len());
        let mut output = TranslationData::new();
        let mut misses: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for (key, text) in data {
            if text.trim().is_empty() {
                output.insert(key.clone(), text.clone());
                tracker.advance(1, progress);
            } else if let Some(cached) = self.store.lookup(text, language) {
                debug!("Using exact dictionary match for '{}'", text);
                output.insert(key.clone(), cached);
                tracker.advance(1, progress);
            } else {
                misses.entry(text.as_str()).or_default().push(key.clone());
            }
        }

        let pending: Vec<PendingText> = misses
            .into_iter()
            .filter_map(|(text, keys)| {
                let first = keys.first()?.clone();
                Some(PendingText {
                    unit: TranslationUnit::new(first, text),
                    keys,
                })
            })
            .collect();

        info!(
            "Translating {} entries to {}: {} from dictionary, {} distinct texts to translate",
            data.len(),
            language,
            output.len(),
            pending.len()
        );

        let results = if pending.is_empty() {
            HashMap::new()
        } else if self.options.batch_size > 1 {
            self.translate_batched(&pending, &tracker, progress).await
        } else {
            self.translate_singly(&pending, &tracker, progress).await
        };

        let mut failed = 0;
        for item in &pending {
            let text = item.unit.source_text.as_str();
            let translated = match results.get(text) {
                Some(result) if result.is_valid => {
                    self.store.add(text, language, &result.output);
                    result.output.clone()
                }
                Some(result) => {
                    if let Some(err) = &result.error {
                        failed += 1;
                        warn!("Failed to translate '{}': {}", item.unit.key, err);
                    }
                    result.output.clone()
                }
                None => {
                    failed += 1;
                    warn!("Failed to translate '{}': {}", item.unit.key, ItemError::MissingTranslation);
                    text.to_string()
                }
            };

            for key in &item.keys {
                output.insert(key.clone(), translated.clone());
            }
        }

        if failed > 0 {
            warn!("{} of {} texts kept their original value", failed, pending.len());
        }

        self.store.persist();
        output
    }

    async fn translate_batched(
        &self,
        pending: &[PendingText],
        tracker: &ProgressTracker,
        progress: &dyn ProgressSink,
    ) -> HashMap<String, TranslationResult> {
        let weights: HashMap<&str, usize> = pending
            .iter()
            .map(|p| (p.unit.source_text.as_str(), p.keys.len()))
            .collect();
        let width = self.options.max_concurrent_requests.max(1);
        let chunks: Vec<&[PendingText]> = pending.chunks(self.options.batch_size).collect();
        let total_chunks = chunks.len();

        let chunk_results: Vec<Vec<TranslationResult>> = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| async move {
                let units: Vec<TranslationUnit> = chunk.iter().map(|p| p.unit.clone()).collect();
                let results = self.translate_chunk(&units).await;

                let answered: usize = chunk
                    .iter()
                    .zip(&results)
                    .filter(|(_, r)| r.is_answered())
                    .map(|(p, _)| p.keys.len())
                    .sum();
                tracker.advance(answered, progress);

                debug!("Batch {} of {} completed", index + 1, total_chunks);
                results
            })
            .buffer_unordered(width)
            .collect()
            .await;

        let mut results: Vec<TranslationResult> = chunk_results.into_iter().flatten().collect();

        let inputs: Vec<&str> = pending.iter().map(|p| p.unit.source_text.as_str()).collect();
        let report = validation::validate(&inputs, &results);
        if !report.is_valid {
            warn!(
                "{} texts missing from batch responses, retrying individually",
                report.missing_count()
            );

            let retried: Vec<TranslationResult> = stream::iter(report.missing_inputs)
                .map(|text| {
                    let weight = weights.get(text.as_str()).copied().unwrap_or(1);
                    async move {
                        let result = self.translate_one(&text).await;
                        tracker.advance(weight, progress);
                        result
                    }
                })
                .buffer_unordered(width)
                .collect()
                .await;

            results.extend(retried);
        }

        let mut by_text: HashMap<String, TranslationResult> = HashMap::new();
        for result in results {
            match by_text.entry(result.input.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(result);
                }
                Entry::Occupied(mut slot) => {
                    if !slot.get().is_answered() {
                        slot.insert(result);
                    }
                }
            }
        }
        by_text
    }

    async fn translate_singly(
        &self,
        pending: &[PendingText],
        tracker: &ProgressTracker,
        progress: &dyn ProgressSink,
    ) -> HashMap<String, TranslationResult> {
        let language = self.options.target_language.as_str();

        stream::iter(pending)
            .map(|item| async move {
                let text = item.unit.source_text.as_str();
                let result = self.translate_one(text).await;

                // later items may use this one as an example
                if result.is_valid {
                    self.store.add(text, language, &result.output);
                }
                tracker.advance(item.keys.len(), progress);

                (text.to_string(), result)
            })
            .buffer_unordered(self.options.max_concurrent_requests.max(1))
            .collect()
            .await
    }

    /// Translate one chunk; a failed call fails every unit in it
    async fn translate_chunk(&self, units: &[TranslationUnit]) -> Vec<TranslationResult> {
        let shape = self.options.prompt_shape;
        let request = self.codec.encode_batch(units, shape);

        match self.call(request).await {
            Ok(response) => self.codec.decode_batch(units, shape, &response),
            Err(e) => {
                warn!("Batch of {} texts failed: {}", units.len(), e);
                let error = ItemError::from(e);
                units
                    .iter()
                    .map(|unit| TranslationResult::failed(&unit.source_text, error.clone()))
                    .collect()
            }
        }
    }

    /// Translate one text, with similar dictionary entries as examples
    async fn translate_one(&self, text: &str) -> TranslationResult {
        let examples = self.store.find_similar(
            text,
            &self.options.target_language,
            self.options.similarity_threshold,
            self.options.max_examples,
        );
        if !examples.is_empty() {
            debug!("Found {} similar examples for '{}'", examples.len(), text);
        }

        let request = self.codec.encode_single(text, &examples);
        match self.call(request).await {
            Ok(response) => self.codec.decode_single(text, &response),
            Err(e) => TranslationResult::failed(text, ItemError::from(e)),
        }
    }

    /// One rate-limited, time-bounded service call
    async fn call(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        let timeout = self.options.request_timeout;
        match tokio::time::timeout(timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout.as_secs())),
        }
    }
}
