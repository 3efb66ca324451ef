use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::{Config, Engine};
use crate::errors::ConfigError;
use crate::file_utils::{FileManager, InputType};
use crate::lang_file;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::quests::{self, QuestDocument};
use crate::translation::{BatchCoordinator, DictionaryStore, ProgressUpdate, TranslationData};

// @module: Application controller for mod localization

/// Samples shown per file in dry-run mode
const LANGUAGE_FILE_SAMPLES: usize = 3;
const QUEST_FILE_SAMPLES: usize = 5;

/// What happened to one input file
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Written file, `None` for dry runs and files with nothing to translate
    pub output: Option<PathBuf>,
    /// Entries extracted from the input
    pub entries: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation service; built from the config on first use when unset
    provider: Option<Arc<dyn Provider>>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config, provider: None })
    }

    /// Create a controller that uses `provider` instead of the configured engine
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            config,
            provider: Some(provider),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the translation service the configuration names
    pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>, ConfigError> {
        let translation = &config.translation;
        match translation.engine {
            Engine::OpenAI => {
                let api_key = translation.get_api_key();
                if api_key.is_empty() {
                    return Err(ConfigError::MissingApiKey(translation.engine.display_name().to_string()));
                }
                let common = &translation.common;
                let client = OpenAI::new(api_key, translation.get_endpoint(), translation.get_model())
                    .with_retry(common.retry_count, common.retry_backoff_ms)
                    .with_timeout(translation.get_timeout_secs())
                    .with_temperature(Some(common.temperature));
                Ok(Arc::new(client))
            }
            other => Err(ConfigError::EngineNotImplemented(other.display_name().to_string())),
        }
    }

    /// Process one input path
    ///
    /// `output` is a file for single inputs and a directory for directory inputs.
    pub async fn run(&self, input: &Path, output: Option<PathBuf>, dry_run: bool) -> Result<Vec<FileOutcome>> {
        let start_time = Instant::now();
        let input_type = FileManager::detect_input_type(input)?;
        info!("Input: {} ({})", input.display(), input_type);

        let coordinator = if dry_run { None } else { Some(self.coordinator()?) };
        let coordinator = coordinator.as_ref();

        let outcomes = match input_type {
            InputType::LanguageFile => vec![self.process_language_file(input, output, coordinator).await?],
            InputType::QuestFile => vec![self.process_quest_file(input, output, coordinator).await?],
            InputType::Directory => self.process_directory(input, output, coordinator).await?,
            InputType::Archive => {
                return Err(anyhow!(
                    "JAR files are not supported; extract the language files and pass them directly: {}",
                    input.display()
                ));
            }
            InputType::Unknown => {
                return Err(anyhow!("Unsupported input type: {}", input.display()));
            }
        };

        if !dry_run {
            info!(
                "Processed {} file(s) in {}",
                outcomes.len(),
                Self::format_duration(start_time.elapsed())
            );
        }
        Ok(outcomes)
    }

    fn coordinator(&self) -> Result<BatchCoordinator> {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => Self::create_provider(&self.config).context("Failed to create translation service")?,
        };
        let store = Arc::new(DictionaryStore::at_path(&self.config.dictionary_path));

        Ok(BatchCoordinator::new(provider, store, self.config.translation_options())
            .with_rate_limiter(self.config.rate_limiter()))
    }

    async fn process_language_file(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        coordinator: Option<&BatchCoordinator>,
    ) -> Result<FileOutcome> {
        info!("Processing language file: {}", input.display());

        let (data, format) = lang_file::read_file(input).context("Error parsing file")?;
        info!("Detected format: {}", format);
        info!("Found {} translation keys", data.len());

        let Some(coordinator) = coordinator else {
            Self::show_samples(&data, LANGUAGE_FILE_SAMPLES, "keys");
            return Ok(FileOutcome {
                input: input.to_path_buf(),
                output: None,
                entries: data.len(),
            });
        };

        let locale = language_utils::format_language_code_for_version(
            &self.config.target_language,
            &self.config.minecraft_version,
        )?;
        let output_path = output.unwrap_or_else(|| FileManager::generate_output_path(input, &locale));

        let translated = self.translate_with_progress(coordinator, &data).await;
        lang_file::write_file(&output_path, &translated, format)?;

        info!("Processing completed: {}", output_path.display());
        Ok(FileOutcome {
            input: input.to_path_buf(),
            output: Some(output_path),
            entries: data.len(),
        })
    }

    async fn process_quest_file(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        coordinator: Option<&BatchCoordinator>,
    ) -> Result<FileOutcome> {
        info!("Processing BetterQuesting file: {}", input.display());

        let mut document = QuestDocument::load(input)?;
        let data = document.extract();
        info!("Found {} translatable strings ({:?} keys)", data.len(), document.dialect());

        let mut outcome = FileOutcome {
            input: input.to_path_buf(),
            output: None,
            entries: data.len(),
        };

        if data.is_empty() {
            warn!("No translatable text found in {}", input.display());
            return Ok(outcome);
        }

        let Some(coordinator) = coordinator else {
            Self::show_samples(&data, QUEST_FILE_SAMPLES, "strings");
            return Ok(outcome);
        };

        let output_path =
            output.unwrap_or_else(|| FileManager::generate_output_path(input, &self.config.target_language));

        let translated = self.translate_with_progress(coordinator, &data).await;
        let updated = document.apply(&translated);
        debug!("Updated {} fields", updated);
        document.save(&output_path)?;

        info!("Translated BetterQuesting file saved: {}", output_path.display());
        outcome.output = Some(output_path);
        Ok(outcome)
    }

    /// Translate every quest file found under `input_dir`
    ///
    /// With an output directory, each file keeps its path relative to
    /// `input_dir`. A failing file is logged and skipped.
    async fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<PathBuf>,
        coordinator: Option<&BatchCoordinator>,
    ) -> Result<Vec<FileOutcome>> {
        let files = quests::find_quest_files(input_dir);
        if files.is_empty() {
            warn!("No BetterQuesting files found in {}", input_dir.display());
            return Ok(Vec::new());
        }
        info!("Found {} BetterQuesting file(s)", files.len());

        if let Some(dir) = &output_dir {
            FileManager::ensure_dir(dir)?;
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let output = output_dir.as_ref().map(|dir| {
                FileManager::mirrored_output_path(input_dir, &file, dir, &self.config.target_language)
            });

            match self.process_quest_file(&file, output, coordinator).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Error processing {}: {:#}", file.display(), e),
            }
        }
        Ok(outcomes)
    }

    async fn translate_with_progress(&self, coordinator: &BatchCoordinator, data: &TranslationData) -> TranslationData {
        info!(
            "Starting translation with {} - {} (similarity threshold: {:.1}, batch size: {})",
            self.config.translation.engine.display_name(),
            self.config.translation.get_model(),
            coordinator.options().similarity_threshold,
            coordinator.options().batch_size
        );

        let progress_bar = ProgressBar::new(data.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let sink = move |update: ProgressUpdate| {
            bar.set_length(update.total as u64);
            bar.set_position(update.completed as u64);
        };

        let translated = coordinator.translate(data, &sink).await;
        progress_bar.finish_and_clear();
        translated
    }

    fn show_samples(data: &TranslationData, limit: usize, noun: &str) {
        info!("Dry run mode - showing sample {}:", noun);
        for (key, value) in data.iter().take(limit) {
            info!("  {}: {}", key, value);
        }
        if data.len() > limit {
            info!("  ... and {} more {}", data.len() - limit, noun);
        }
    }

    // @formats: Duration as a short human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
