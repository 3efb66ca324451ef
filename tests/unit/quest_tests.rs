/*!
 * Tests for BetterQuesting documents
 */

use anyhow::Result;
use modlocalizer::quests::{self, Dialect, QuestDocument};
use serde_json::{Value, json};

use crate::common;

#[test]
fn test_extract_findOreScenario_shouldProduceSingleKey() -> Result<()> {
    let document = QuestDocument::from_value(json!({
        "questDatabase:9": {"1": {"properties:9": {"betterquesting:9": {"name:8": "Find Ore"}}}}
    }));

    let data = document.extract();

    assert_eq!(data, common::data(&[("quest.1.name", "Find Ore")]));
    Ok(())
}

#[test]
fn test_apply_findOreScenario_shouldOnlyChangeName() -> Result<()> {
    let mut document = QuestDocument::from_value(json!({
        "questDatabase:9": {"1": {"properties:9": {"betterquesting:9": {"name:8": "Find Ore", "isMain:1": 0}}}}
    }));

    document.apply(&common::data(&[("quest.1.name", "鉱石を探す")]));

    assert_eq!(
        document.as_value(),
        &json!({
            "questDatabase:9": {"1": {"properties:9": {"betterquesting:9": {"name:8": "鉱石を探す", "isMain:1": 0}}}}
        })
    );
    Ok(())
}

#[test]
fn test_roundTrip_identityTranslations_shouldReproduceBothDialects() -> Result<()> {
    for content in [common::SAMPLE_QUESTS_STANDARD, common::SAMPLE_QUESTS_TAGGED] {
        let original: Value = serde_json::from_str(content)?;
        let mut document = QuestDocument::parse(content)?;

        let data = document.extract();
        assert!(!data.is_empty());
        document.apply(&data);

        assert_eq!(document.as_value(), &original);
        assert_eq!(document.extract(), data);
    }
    Ok(())
}

#[test]
fn test_dialect_shouldFollowTopLevelKeys() -> Result<()> {
    assert_eq!(QuestDocument::parse(common::SAMPLE_QUESTS_STANDARD)?.dialect(), Dialect::Standard);
    assert_eq!(QuestDocument::parse(common::SAMPLE_QUESTS_TAGGED)?.dialect(), Dialect::Tagged);
    Ok(())
}

#[test]
fn test_extract_standardSample_shouldIncludeLinesAndRewards() -> Result<()> {
    let data = QuestDocument::parse(common::SAMPLE_QUESTS_STANDARD)?.extract();

    assert_eq!(data["quest.0.name"], "Getting Started");
    assert_eq!(data["quest.0.description"], "Punch a tree");
    assert_eq!(data["quest.0.reward.0.command"], "/say Welcome!");
    assert_eq!(data["questline.0.name"], "Chapter One");
    assert_eq!(data["questline.0.description"], "The basics");
    assert_eq!(data.len(), 5);
    Ok(())
}

#[test]
fn test_extract_arrayDatabase_shouldUseIndexes() -> Result<()> {
    let document = QuestDocument::from_value(json!({
        "questDatabase": [
            {"properties": {"betterquesting": {"name": "First"}}},
            {"properties": {"betterquesting": {"name": "Second"}}}
        ]
    }));

    let data = document.extract();

    assert_eq!(data, common::data(&[("quest.0.name", "First"), ("quest.1.name", "Second")]));
    Ok(())
}

#[test]
fn test_extract_technicalOnlyDocument_shouldBeEmpty() -> Result<()> {
    let document = QuestDocument::from_value(json!({
        "questDatabase": {"0": {"properties": {"betterquesting": {"name": "QUEST_ONE", "desc": "#FFAA00"}}}}
    }));

    assert!(document.extract().is_empty());
    Ok(())
}

#[test]
fn test_saveThenLoad_shouldPreserveTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "DefaultQuests.json", common::SAMPLE_QUESTS_TAGGED)?;
    let output = temp_dir.path().join("DefaultQuests_ja_jp.json");

    let mut document = QuestDocument::load(&input)?;
    document.apply(&common::data(&[("quest.1.description", "鉄鉱石を掘る")]));
    document.save(&output)?;

    let reloaded = QuestDocument::load(&output)?;
    assert_eq!(reloaded.extract()["quest.1.description"], "鉄鉱石を掘る");
    assert_eq!(reloaded.extract()["quest.1.name"], "Find Ore");
    Ok(())
}

#[test]
fn test_findQuestFiles_instanceLayout_shouldFindQuestFilesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "config/betterquesting/DefaultQuests.json", common::SAMPLE_QUESTS_STANDARD)?;
    common::create_test_file(root, "saves/world/betterquesting/QuestDatabase.json", common::SAMPLE_QUESTS_TAGGED)?;
    common::create_test_file(root, "config/othermod.json", r#"{"enabled": true}"#)?;
    common::create_test_file(root, "config/betterquesting/readme.txt", "questDatabase")?;

    let found = quests::find_quest_files(root);

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|path| quests::is_quest_file(path)));
    Ok(())
}
