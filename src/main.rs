// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use modlocalizer::app_config::{Config, Engine, LogLevel};
use modlocalizer::app_controller::Controller;
use modlocalizer::language_utils;

/// CLI Wrapper for Engine to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEngine {
    #[value(name = "openai")]
    OpenAI,
    Google,
    #[value(name = "deepl")]
    DeepL,
}

impl From<CliEngine> for Engine {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::OpenAI => Engine::OpenAI,
            CliEngine::Google => Engine::Google,
            CliEngine::DeepL => Engine::DeepL,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a language file, quest file or instance directory (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for modlocalizer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
struct TranslateArgs {
    /// Language file (.json, .lang), BetterQuesting file, or instance directory
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (or directory for directory inputs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target Minecraft locale (e.g. 'ja_jp', 'ko_kr')
    #[arg(short, long)]
    lang: Option<String>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Minecraft version the output is for; 1.10 and older use 'ja_JP' style codes
    #[arg(short, long)]
    minecraft_version: Option<String>,

    /// Parse the input and show statistics without translating
    #[arg(long)]
    dry_run: bool,

    /// Similarity threshold for finding similar examples (0.0-1.0)
    #[arg(short, long)]
    similarity: Option<f64>,

    /// Entries per request; 1 translates one entry at a time with examples
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Term dictionary file
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// MinecraftModsLocalizer - translate Minecraft mod language files and quests with AI
#[derive(Parser, Debug)]
#[command(name = "modlocalizer")]
#[command(version)]
#[command(about = "AI-powered Minecraft mod localization tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "modlocalizer translates Minecraft language files and BetterQuesting quest files.

EXAMPLES:
    modlocalizer en_us.json                                # Translate to the configured locale
    modlocalizer en_us.json -l ko_kr -s 0.7                # Korean, stricter example matching
    modlocalizer en_US.lang -m 1.7.10                      # Legacy .lang output (ja_JP.lang)
    modlocalizer config/betterquesting/DefaultQuests.json  # Translate a quest file
    modlocalizer ./instance --dry-run                      # List quest texts of an instance
    modlocalizer completions bash > modlocalizer.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically. OPENAI_API_KEY,
    OPENAI_BASE_URL and OPENAI_MODEL override the OpenAI settings.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
// The level lives in `log::max_level`, so it can change after init
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once it is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "modlocalizer", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = args.log_level {
        log::set_max_level(LogLevel::from(level).into());
    }

    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

    let mut config = Config::load_or_create(&args.config_path)?;
    config.apply_env_overrides();
    apply_cli_overrides(&mut config, &args);

    if args.dry_run {
        // No service calls in a dry run, so credentials are not required
        language_utils::validate_language_code(&config.target_language)
            .context("Configuration validation failed")?;
    } else {
        config.validate().context("Configuration validation failed")?;
    }

    if args.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    info!("MinecraftModsLocalizer");
    info!("Target Language: {}", config.target_language);
    info!("Engine: {}", config.translation.engine.display_name());

    let controller = Controller::with_config(config)?;
    let outcomes = controller.run(&input, args.output, args.dry_run).await?;

    if args.dry_run {
        let entries: usize = outcomes.iter().map(|o| o.entries).sum();
        info!("{} file(s), {} entries. Run without --dry-run to translate.", outcomes.len(), entries);
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut Config, args: &TranslateArgs) {
    if let Some(lang) = &args.lang {
        config.target_language = lang.clone();
    }
    if let Some(engine) = args.engine {
        config.translation.engine = engine.into();
    }
    if let Some(version) = &args.minecraft_version {
        config.minecraft_version = version.clone();
    }
    if let Some(similarity) = args.similarity {
        config.translation.common.similarity_threshold = similarity;
    }
    if let Some(batch_size) = args.batch_size {
        config.translation.common.batch_size = batch_size;
    }
    if let Some(dictionary) = &args.dictionary {
        config.dictionary_path = dictionary.to_string_lossy().to_string();
    }
    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }
}
