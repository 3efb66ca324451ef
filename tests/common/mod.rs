/*!
 * Common test utilities for the modlocalizer test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use modlocalizer::providers::mock::MockProvider;
use modlocalizer::translation::{
    BatchCoordinator, DictionaryStore, TermDictionary, TranslationData, TranslationOptions,
};

/// Route log output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build a mapping from string pairs
pub fn data(pairs: &[(&str, &str)]) -> TranslationData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Options for a run with the given batch size
pub fn options(target_language: &str, batch_size: usize) -> TranslationOptions {
    TranslationOptions {
        target_language: target_language.to_string(),
        batch_size,
        ..TranslationOptions::default()
    }
}

/// Coordinator over an in-memory dictionary; returns the store for inspection
pub fn coordinator(
    provider: MockProvider,
    dictionary: TermDictionary,
    options: TranslationOptions,
) -> (BatchCoordinator, Arc<DictionaryStore>) {
    init_test_logging();
    let store = Arc::new(DictionaryStore::in_memory(dictionary));
    let coordinator = BatchCoordinator::new(Arc::new(provider), Arc::clone(&store), options);
    (coordinator, store)
}

/// English language file of a small mod
pub const SAMPLE_LANG_JSON: &str = r#"{
  "item.examplemod.iron_hammer": "Iron Hammer",
  "item.examplemod.gold_hammer": "Gold Hammer",
  "block.examplemod.anvil": "Reinforced Anvil",
  "gui.examplemod.title": "Hammer Workshop"
}"#;

/// Quest file in the standard dialect
pub const SAMPLE_QUESTS_STANDARD: &str = r#"{
  "format": "2.0.0",
  "questDatabase": {
    "0": {
      "questID": 0,
      "properties": {"betterquesting": {"name": "Getting Started", "desc": "Punch a tree", "icon": {"id": "minecraft:log"}}},
      "rewards": {"0": {"rewardID": "bq_standard:command", "command": "/say Welcome!"}}
    }
  },
  "questLines": {
    "0": {"lineID": 0, "properties": {"betterquesting": {"name": "Chapter One", "desc": "The basics"}}}
  }
}"#;

/// Quest file in the NBT-tagged dialect
pub const SAMPLE_QUESTS_TAGGED: &str = r#"{
  "format:8": "2.0.0",
  "questDatabase:9": {
    "1": {"properties:10": {"betterquesting:10": {"name:8": "Find Ore", "desc:8": "Mine some iron ore", "isMain:1": 1}}}
  }
}"#;
