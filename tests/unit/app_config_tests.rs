/*!
 * Tests for application configuration
 */

use anyhow::Result;
use modlocalizer::app_config::{Config, Engine, LogLevel};
use modlocalizer::errors::ConfigError;

use crate::common;

#[test]
fn test_loadOrCreate_fullConfigFile_shouldParseAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = r#"{
        "target_language": "ko_kr",
        "minecraft_version": "1.12.2",
        "dictionary_path": "dicts/terms.json",
        "log_level": "debug",
        "translation": {
            "engine": "openai",
            "available_providers": [{
                "type": "openai",
                "model": "gpt-4o",
                "api_key": "sk-file",
                "endpoint": "http://localhost:8080/v1",
                "concurrent_requests": 4,
                "timeout_secs": 30,
                "rate_limit": 120
            }],
            "common": {"batch_size": 25, "similarity_threshold": 0.7, "include_keys": false}
        }
    }"#;
    let path = common::create_test_file(temp_dir.path(), "conf.json", content)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.get_model(), "gpt-4o");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:8080/v1");
    assert_eq!(config.translation.get_rate_limit(), Some(120));
    assert_eq!(config.validate(), Ok(()));

    let options = config.translation_options();
    assert_eq!(options.target_language, "ko_kr");
    assert_eq!(options.batch_size, 25);
    assert_eq!(options.max_concurrent_requests, 4);
    assert_eq!(options.request_timeout.as_secs(), 30);
    Ok(())
}

#[test]
fn test_validate_shouldFailFastOnEveryConfigProblem() {
    let mut config = Config::default();
    config.translation.provider_config_mut(Engine::OpenAI).api_key = "sk".to_string();
    assert_eq!(config.validate(), Ok(()));

    let mut no_key = config.clone();
    no_key.translation.provider_config_mut(Engine::OpenAI).api_key = "   ".to_string();
    assert!(matches!(no_key.validate(), Err(ConfigError::MissingApiKey(_))));

    let mut deepl = config.clone();
    deepl.translation.engine = Engine::DeepL;
    assert!(matches!(deepl.validate(), Err(ConfigError::EngineNotImplemented(_))));

    let mut bad_lang = config.clone();
    bad_lang.target_language = "klingon".to_string();
    assert!(matches!(bad_lang.validate(), Err(ConfigError::UnsupportedLanguage(_))));

    let mut bad_threshold = config;
    bad_threshold.translation.common.similarity_threshold = -0.1;
    assert!(matches!(bad_threshold.validate(), Err(ConfigError::InvalidSetting { .. })));
}

#[test]
fn test_rateLimiter_shouldFollowProviderSetting() {
    let mut config = Config::default();
    assert!(config.rate_limiter().is_some());

    config.translation.provider_config_mut(Engine::OpenAI).rate_limit = None;
    assert!(config.rate_limiter().is_none());

    config.translation.provider_config_mut(Engine::OpenAI).rate_limit = Some(0);
    assert!(config.rate_limiter().is_none());
}
