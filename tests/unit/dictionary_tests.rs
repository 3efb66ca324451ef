/*!
 * Tests for similarity scoring and the term dictionary
 */

use anyhow::Result;
use modlocalizer::translation::similarity::similarity;
use modlocalizer::translation::{DictionaryStore, TermDictionary};

use crate::common;

const SAMPLES: [&str; 8] = [
    "Iron Sword",
    "Iron Axe",
    "iron sword",
    "Diamond Pickaxe",
    "鉄の剣",
    "a",
    "Right-click to open the crafting interface",
    " ",
];

#[test]
fn test_similarity_identity_shouldBeOne() {
    for text in SAMPLES.iter().chain([""].iter()) {
        assert_eq!(similarity(text, text), 1.0, "similarity({:?}, itself)", text);
    }
}

#[test]
fn test_similarity_shouldBeSymmetricAndBounded() {
    for a in SAMPLES {
        for b in SAMPLES {
            let ab = similarity(a, b);
            assert_eq!(ab, similarity(b, a), "{:?} vs {:?}", a, b);
            assert!((0.0..=1.0).contains(&ab));
        }
    }
}

#[test]
fn test_similarity_againstEmpty_shouldBeZero() {
    for text in SAMPLES {
        assert_eq!(similarity(text, ""), 0.0, "{:?}", text);
    }
}

#[test]
fn test_lookup_afterAdd_shouldReturnAddedValue() {
    let mut dictionary = TermDictionary::new();
    for (i, text) in SAMPLES.iter().enumerate() {
        let translation = format!("訳{}", i);
        dictionary.add(text, "ja_jp", &translation);
        assert_eq!(dictionary.lookup(text, "ja_jp"), Some(translation.as_str()));
    }

    dictionary.add("Iron Sword", "ja_jp", "鉄剣");
    assert_eq!(dictionary.lookup("Iron Sword", "ja_jp"), Some("鉄剣"));
    assert_eq!(dictionary.lookup("Iron Sword", "ko_kr"), None);
}

#[test]
fn test_findSimilar_shouldRespectThresholdAndOrder() {
    let mut dictionary = TermDictionary::new();
    for text in SAMPLES {
        dictionary.add(text, "ja_jp", "x");
    }

    for threshold in [0.0, 0.3, 0.5, 0.8, 1.0] {
        let matches = dictionary.find_similar("Iron Sword", "ja_jp", threshold, 10);

        assert!(matches.iter().all(|m| m.score >= threshold));
        assert!(matches.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    let top = dictionary.find_similar("Iron Sword", "ja_jp", 0.0, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].example.original, "Iron Sword");
}

#[test]
fn test_store_persistAndReload_shouldKeepEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("dicts").join("dictionary.json");

    let store = DictionaryStore::at_path(&path);
    store.load();
    store.add("Iron Axe", "ja_jp", "鉄の斧");
    store.persist();

    let content = std::fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(value["terms"]["ja_jp"]["Iron Axe"], "鉄の斧");

    let reloaded = DictionaryStore::at_path(&path);
    reloaded.load();
    assert_eq!(reloaded.lookup("Iron Axe", "ja_jp").as_deref(), Some("鉄の斧"));

    Ok(())
}

#[test]
fn test_store_corruptFile_shouldLoadEmptyAndKeepWorking() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "dictionary.json", "{ not json")?;

    let store = DictionaryStore::at_path(&path);
    store.load();

    assert!(store.snapshot().is_empty());
    store.add("Stone", "ja_jp", "石");
    assert_eq!(store.lookup("Stone", "ja_jp").as_deref(), Some("石"));

    Ok(())
}
