/*!
 * Whole-run tests for the batch coordinator
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use modlocalizer::providers::mock::MockProvider;
use modlocalizer::translation::{
    BatchCoordinator, DictionaryStore, NoProgress, ProgressUpdate, PromptShape, RateLimiter, TermDictionary,
    TranslationData, TranslationOptions,
};

use crate::common;

fn assert_same_keys(input: &TranslationData, output: &TranslationData) {
    assert_eq!(
        input.keys().collect::<Vec<_>>(),
        output.keys().collect::<Vec<_>>(),
        "output keys must equal input keys"
    );
}

#[tokio::test]
async fn test_translate_ironSwordScenario_shouldReuseDictionaryAndLearn() {
    let mut dictionary = TermDictionary::new();
    dictionary.add("Iron Sword", "ja", "鉄の剣");
    let provider = MockProvider::working();
    let calls = provider.clone();
    let options = TranslationOptions {
        similarity_threshold: 0.4,
        ..common::options("ja", 1)
    };
    let (coordinator, store) = common::coordinator(provider, dictionary, options);
    let input = common::data(&[("item.sword", "Iron Sword"), ("item.axe", "Iron Axe")]);

    let output = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(output["item.sword"], "鉄の剣");
    assert_eq!(output["item.axe"], "[TRANSLATED] Iron Axe");
    assert_eq!(store.lookup("Iron Axe", "ja").as_deref(), Some("[TRANSLATED] Iron Axe"));

    let requests = calls.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Text to translate: Iron Axe"));
    assert!(requests[0].prompt.contains("\"Iron Sword\" → \"鉄の剣\""));
}

#[tokio::test]
async fn test_translate_responseMissingOneLine_shouldRetryOnlyThatItem() {
    let provider = MockProvider::dropping_line(2);
    let calls = provider.clone();
    let (coordinator, store) = common::coordinator(provider, TermDictionary::new(), common::options("ja_jp", 3));
    let input = common::data(&[("a", "Copper Ingot"), ("b", "Tin Ingot"), ("c", "Bronze Ingot")]);

    let output = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(calls.request_count(), 2);
    for (key, text) in &input {
        assert_eq!(output[key], format!("[TRANSLATED] {}", text));
    }
    assert_eq!(store.snapshot().len_for("ja_jp"), 3);
}

#[tokio::test]
async fn test_translate_failingProviders_shouldKeepEveryKey() {
    let input = common::data(&[
        ("a", "Copper Ingot"),
        ("b", "Tin Ingot"),
        ("c", "Bronze Ingot"),
        ("d", "Steel Ingot"),
        ("e", ""),
    ]);

    for batch_size in [1, 2] {
        for provider in [MockProvider::failing(), MockProvider::empty(), MockProvider::intermittent(2)] {
            let (coordinator, _) =
                common::coordinator(provider, TermDictionary::new(), common::options("ja_jp", batch_size));

            let output = coordinator.translate(&input, &NoProgress).await;

            assert_same_keys(&input, &output);
            for (key, text) in &input {
                assert!(output[key] == *text || output[key] == format!("[TRANSLATED] {}", text));
            }
        }
    }
}

#[tokio::test]
async fn test_translate_failingProvider_shouldNotLearnAnything() {
    let input = common::data(&[("a", "Copper Ingot")]);
    let (coordinator, store) =
        common::coordinator(MockProvider::failing(), TermDictionary::new(), common::options("ja_jp", 1));

    let output = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(output, input);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_translate_secondRun_shouldBeServedFromDictionary() {
    let provider = MockProvider::working();
    let calls = provider.clone();
    let (coordinator, _) = common::coordinator(provider, TermDictionary::new(), common::options("ja_jp", 2));
    let input = common::data(&[("a", "Copper Ingot"), ("b", "Tin Ingot"), ("c", "Copper Ingot")]);

    let first = coordinator.translate(&input, &NoProgress).await;
    let requests_after_first = calls.request_count();
    let second = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(first, second);
    assert_eq!(calls.request_count(), requests_after_first);
    assert_eq!(second["a"], second["c"]);
}

#[tokio::test]
async fn test_translate_plainNumberedAnswers_shouldUseFallbackDecoder() {
    let (coordinator, _) =
        common::coordinator(MockProvider::plain_numbered(), TermDictionary::new(), common::options("ja_jp", 10));
    let input = common::data(&[("a", "Copper Ingot"), ("b", "Tin Ingot"), ("c", "Bronze Ingot")]);

    let output = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(output["a"], "[TRANSLATED] Copper Ingot");
    assert_eq!(output["b"], "[TRANSLATED] Tin Ingot");
    assert_eq!(output["c"], "[TRANSLATED] Bronze Ingot");
}

#[tokio::test]
async fn test_translate_positionalPrompts_shouldNotSendKeys() {
    let provider = MockProvider::working();
    let calls = provider.clone();
    let options = TranslationOptions {
        prompt_shape: PromptShape::Positional,
        ..common::options("ja_jp", 5)
    };
    let (coordinator, _) = common::coordinator(provider, TermDictionary::new(), options);
    let input = common::data(&[("item.secret_key", "Copper Ingot"), ("item.other", "Tin Ingot")]);

    let output = coordinator.translate(&input, &NoProgress).await;

    assert_eq!(output["item.secret_key"], "[TRANSLATED] Copper Ingot");
    assert!(!calls.requests()[0].prompt.contains("item.secret_key"));
}

#[tokio::test]
async fn test_translate_concurrentWorkers_shouldMatchSequentialRun() {
    let input: TranslationData = (0..20)
        .map(|i| (format!("item.{:02}", i), format!("Material number {}", i)))
        .collect();

    let (sequential, _) = common::coordinator(MockProvider::working(), TermDictionary::new(), common::options("ja_jp", 3));
    let concurrent_options = TranslationOptions {
        max_concurrent_requests: 4,
        ..common::options("ja_jp", 3)
    };
    let (concurrent, _) = common::coordinator(MockProvider::slow(5), TermDictionary::new(), concurrent_options);

    let expected = sequential.translate(&input, &NoProgress).await;
    let actual = concurrent.translate(&input, &NoProgress).await;

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_translate_rateLimiter_shouldSpaceRequests() {
    let provider = MockProvider::working();
    let calls = provider.clone();
    let store = Arc::new(DictionaryStore::in_memory(TermDictionary::new()));
    let coordinator = BatchCoordinator::new(Arc::new(provider), store, common::options("ja_jp", 1))
        .with_rate_limiter(Some(RateLimiter::with_interval(Duration::from_millis(30))));
    let input = common::data(&[("a", "Copper Ingot"), ("b", "Tin Ingot"), ("c", "Bronze Ingot")]);

    let started = Instant::now();
    coordinator.translate(&input, &NoProgress).await;

    assert_eq!(calls.request_count(), 3);
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_translate_progressSink_shouldReachTotal() {
    let mut dictionary = TermDictionary::new();
    dictionary.add("Copper Ingot", "ja_jp", "銅インゴット");
    let (coordinator, _) = common::coordinator(MockProvider::dropping_line(1), dictionary, common::options("ja_jp", 2));
    let input = common::data(&[
        ("a", "Copper Ingot"),
        ("b", "Tin Ingot"),
        ("c", "Bronze Ingot"),
        ("d", "Tin Ingot"),
        ("e", " "),
    ]);

    let updates: Mutex<Vec<ProgressUpdate>> = Mutex::new(Vec::new());
    let sink = |update: ProgressUpdate| updates.lock().push(update);
    coordinator.translate(&input, &sink).await;

    let updates = updates.into_inner();
    assert!(updates.windows(2).all(|pair| pair[0].completed <= pair[1].completed));
    let last = updates.last().copied().expect("at least one update");
    assert_eq!(last.total, input.len());
    assert_eq!(last.completed, input.len());
}
