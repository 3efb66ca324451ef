/*!
 * End-to-end tests for the application controller
 */

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use modlocalizer::app_config::Config;
use modlocalizer::app_controller::Controller;
use modlocalizer::lang_file;
use modlocalizer::providers::mock::MockProvider;
use modlocalizer::quests::QuestDocument;

use crate::common;

fn test_config(workspace: &Path) -> Config {
    Config {
        dictionary_path: workspace.join("dictionary.json").to_string_lossy().to_string(),
        ..Config::default()
    }
}

fn controller(workspace: &Path, provider: MockProvider) -> Controller {
    common::init_test_logging();
    Controller::with_provider(test_config(workspace), Arc::new(provider))
}

#[tokio::test]
async fn test_run_languageFile_shouldWriteLocaleSibling() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "assets/examplemod/lang/en_us.json", common::SAMPLE_LANG_JSON)?;

    let outcomes = controller(temp_dir.path(), MockProvider::working()).run(&input, None, false).await?;

    let expected = input.with_file_name("ja_jp.json");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].output.as_deref(), Some(expected.as_path()));
    assert_eq!(outcomes[0].entries, 4);

    let (translated, _) = lang_file::read_file(&expected)?;
    assert_eq!(translated["block.examplemod.anvil"], "[TRANSLATED] Reinforced Anvil");
    assert_eq!(translated.len(), 4);
    assert!(temp_dir.path().join("dictionary.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_legacyVersion_shouldUseUppercaseRegion() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "lang/en_US.lang", "item.hammer.name=Hammer\n")?;
    let config = Config {
        minecraft_version: "1.7.10".to_string(),
        ..test_config(temp_dir.path())
    };

    let controller = Controller::with_provider(config, Arc::new(MockProvider::working()));
    controller.run(&input, None, false).await?;

    let (translated, _) = lang_file::read_file(input.with_file_name("ja_JP.lang"))?;
    assert_eq!(translated["item.hammer.name"], "[TRANSLATED] Hammer");
    Ok(())
}

#[tokio::test]
async fn test_run_questFile_shouldWriteTranslatedCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "DefaultQuests.json", common::SAMPLE_QUESTS_STANDARD)?;

    let outcomes = controller(temp_dir.path(), MockProvider::working()).run(&input, None, false).await?;

    let output = temp_dir.path().join("DefaultQuests_ja_jp.json");
    assert_eq!(outcomes[0].output.as_deref(), Some(output.as_path()));

    let data = QuestDocument::load(&output)?.extract();
    assert_eq!(data["quest.0.name"], "[TRANSLATED] Getting Started");
    assert_eq!(data["questline.0.description"], "[TRANSLATED] The basics");

    let source = QuestDocument::load(&input)?.extract();
    assert_eq!(source["quest.0.name"], "Getting Started");
    Ok(())
}

#[tokio::test]
async fn test_run_instanceDirectory_shouldTranslateEveryQuestFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let instance = temp_dir.path().join("instance");
    common::create_test_file(&instance, "config/betterquesting/DefaultQuests.json", common::SAMPLE_QUESTS_STANDARD)?;
    common::create_test_file(&instance, "saves/world/betterquesting/QuestDatabase.json", common::SAMPLE_QUESTS_TAGGED)?;
    common::create_test_file(&instance, "config/othermod.json", r#"{"enabled": true}"#)?;
    let output_dir = temp_dir.path().join("out");

    let outcomes = controller(temp_dir.path(), MockProvider::working())
        .run(&instance, Some(output_dir.clone()), false)
        .await?;

    assert_eq!(outcomes.len(), 2);
    let tagged = QuestDocument::load(output_dir.join("saves/world/betterquesting/QuestDatabase_ja_jp.json"))?;
    assert_eq!(tagged.extract()["quest.1.name"], "[TRANSLATED] Find Ore");
    assert!(output_dir.join("config/betterquesting/DefaultQuests_ja_jp.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_sameNamedQuestFiles_shouldWriteSeparateOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let instance = temp_dir.path().join("instance");
    common::create_test_file(&instance, "saves/world1/betterquesting/QuestDatabase.json", common::SAMPLE_QUESTS_TAGGED)?;
    common::create_test_file(
        &instance,
        "saves/world2/betterquesting/QuestDatabase.json",
        &common::SAMPLE_QUESTS_TAGGED.replace("Find Ore", "Smelt Iron"),
    )?;
    let output_dir = temp_dir.path().join("out");

    let outcomes = controller(temp_dir.path(), MockProvider::working())
        .run(&instance, Some(output_dir.clone()), false)
        .await?;

    let outputs: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.output.clone()).collect();
    assert_eq!(outputs.len(), 2);
    assert_ne!(outputs[0], outputs[1]);

    let first = QuestDocument::load(output_dir.join("saves/world1/betterquesting/QuestDatabase_ja_jp.json"))?;
    let second = QuestDocument::load(output_dir.join("saves/world2/betterquesting/QuestDatabase_ja_jp.json"))?;
    assert_eq!(first.extract()["quest.1.name"], "[TRANSLATED] Find Ore");
    assert_eq!(second.extract()["quest.1.name"], "[TRANSLATED] Smelt Iron");
    Ok(())
}

#[tokio::test]
async fn test_run_dryRun_shouldNotCallServiceOrWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "en_us.json", common::SAMPLE_LANG_JSON)?;
    let provider = MockProvider::working();
    let calls = provider.clone();

    let outcomes = controller(temp_dir.path(), provider).run(&input, None, true).await?;

    assert_eq!(outcomes[0].output, None);
    assert_eq!(outcomes[0].entries, 4);
    assert_eq!(calls.request_count(), 0);
    assert!(!temp_dir.path().join("ja_jp.json").exists());
    assert!(!temp_dir.path().join("dictionary.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_failingService_shouldStillWriteSourceText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "en_us.json", common::SAMPLE_LANG_JSON)?;

    controller(temp_dir.path(), MockProvider::failing()).run(&input, None, false).await?;

    let (source, _) = lang_file::read_file(&input)?;
    let (written, _) = lang_file::read_file(temp_dir.path().join("ja_jp.json"))?;
    assert_eq!(written, source);
    Ok(())
}

#[tokio::test]
async fn test_run_unsupportedInputs_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let jar = common::create_test_file(temp_dir.path(), "examplemod-1.0.jar", "PK")?;
    let text = common::create_test_file(temp_dir.path(), "notes.txt", "hello")?;
    let controller = controller(temp_dir.path(), MockProvider::working());

    let jar_error = controller.run(&jar, None, false).await.unwrap_err();
    assert!(jar_error.to_string().contains("JAR files are not supported"));
    assert!(controller.run(&text, None, false).await.is_err());
    assert!(controller.run(&temp_dir.path().join("missing.json"), None, false).await.is_err());
    Ok(())
}
