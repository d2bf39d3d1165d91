// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, TranslationProvider};
use crate::batch::{BatchManager, BatchState, FileTask, TranslateFilesParams};
use crate::events::BatchEvent;
use crate::file_utils::FileManager;
use crate::translation::TranslationService;

mod app_config;
mod batch;
mod errors;
mod events;
mod file_utils;
mod language_utils;
mod providers;
mod store;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Together,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Together => TranslationProvider::Together,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the text files of a directory (default command)
    Translate(TranslateArgs),

    /// List the supported languages
    Languages,

    /// Generate shell completions for batrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Directory containing the text files to translate
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(short = 'k', long, env = "BATRANS_API_KEY")]
    api_key: Option<String>,

    /// File extension of the files to translate
    #[arg(short, long, default_value = "txt")]
    extension: String,

    /// Characters per translation segment
    #[arg(long)]
    segment_size: Option<usize>,

    /// File containing custom terminology, one term per line
    #[arg(long)]
    custom_terms: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Show the batch plan without translating anything
    #[arg(long)]
    list: bool,
}

/// batrans - Batch Translation for Text Files
///
/// Translates every text file of a directory through an AI provider,
/// remembering completed files so interrupted batches resume where they left off.
#[derive(Parser, Debug)]
#[command(name = "batrans")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered batch translation of text files")]
#[command(long_about = "batrans translates the text files of a working directory using AI providers.

EXAMPLES:
    batrans ./book -s en -t es                  # Translate using the default provider
    batrans ./book -p together -m meta-llama/Llama-3.3-70B-Instruct-Turbo
    batrans ./book --segment-size 4000          # Chunk long files into 4000-character segments
    batrans ./book --custom-terms glossary.txt  # Apply a custom terminology glossary
    batrans ./book --list                       # Show which files would be translated
    batrans languages                           # List the supported languages
    batrans completions bash > batrans.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. The API key can also be supplied through
    the BATRANS_API_KEY environment variable.

SUPPORTED PROVIDERS:
    gemini    - Google Gemini API (requires API key)
    together  - Together AI API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the text files to translate
    #[arg(value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(short = 'k', long, env = "BATRANS_API_KEY")]
    api_key: Option<String>,

    /// File extension of the files to translate
    #[arg(short, long, default_value = "txt")]
    extension: String,

    /// Characters per translation segment
    #[arg(long)]
    segment_size: Option<usize>,

    /// File containing custom terminology, one term per line
    #[arg(long)]
    custom_terms: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Show the batch plan without translating anything
    #[arg(long)]
    list: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "batrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            for (code, name) in language_utils::supported_languages() {
                println!("{}  {}", code, name);
            }
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let directory = cli
                .directory
                .ok_or_else(|| anyhow!("DIRECTORY is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                directory,
                source_language: cli.source_language,
                target_language: cli.target_language,
                provider: cli.provider,
                model: cli.model,
                api_key: cli.api_key,
                extension: cli.extension,
                segment_size: cli.segment_size,
                custom_terms: cli.custom_terms,
                config_path: cli.config_path,
                log_level: cli.log_level,
                list: cli.list,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration, falling back to the user-level config
    // file when the local one is absent
    let config_path = if Path::new(&options.config_path).exists() {
        options.config_path.clone()
    } else {
        match Config::default_config_path() {
            Some(path) if path.exists() => path.to_string_lossy().to_string(),
            _ => options.config_path.clone(),
        }
    };
    let config_path = &config_path;
    let config = if Path::new(config_path).exists() {
        let mut config = Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }

        if let Some(model) = &options.model {
            // Find the provider config and update the model
            let provider_str = config.translation.provider.to_lowercase_string();
            if let Some(provider_config) = config
                .translation
                .available_providers
                .iter_mut()
                .find(|p| p.provider_type == provider_str)
            {
                provider_config.model = model.clone();
            }
        }

        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }

        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let mut config = Config::default();

        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }
        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
            .save(config_path)
            .context(format!("Failed to write default config to: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Discover the files to translate
    if !options.directory.is_dir() {
        return Err(anyhow!(
            "Input directory does not exist: {:?}",
            options.directory
        ));
    }

    let mut file_names: Vec<String> = FileManager::find_files(&options.directory, &options.extension)?
        .into_iter()
        .filter_map(|path| {
            path.strip_prefix(&options.directory)
                .ok()
                .map(|relative| relative.to_string_lossy().to_string())
        })
        .collect();
    file_names.sort();

    if file_names.is_empty() {
        return Err(anyhow!(
            "No .{} files found in directory: {:?}",
            options.extension.trim_start_matches('.'),
            options.directory
        ));
    }

    if options.list {
        info!("Batch plan for {:?}:", options.directory);
        for name in &file_names {
            println!("{}", name);
        }
        return Ok(());
    }

    // Resolve the API key: CLI/env first, then the provider config
    let api_key = options
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| config.translation.get_api_key());

    if api_key.is_empty() {
        return Err(anyhow!(
            "No API key given; use --api-key or the BATRANS_API_KEY environment variable"
        ));
    }

    // Read the custom terms file, if any
    let custom_terms = match &options.custom_terms {
        Some(path) => {
            if !FileManager::file_exists(path) {
                return Err(anyhow!("Custom terms file does not exist: {:?}", path));
            }
            FileManager::read_to_string(path)?
        }
        None => String::new(),
    };

    // Build the manager around the configured provider
    let service = TranslationService::new(config.translation.clone())
        .map_err(|e| anyhow!("Failed to create translation service: {}", e))?;
    let manager = BatchManager::new(Arc::new(service));

    manager.initialize(
        &options.directory,
        Some(config.translation.provider.clone()),
        Some(config.translation.get_model()),
    )?;

    info!(
        "batrans: {} - {}",
        config.translation.provider.display_name(),
        config.translation.get_model()
    );
    info!(
        "Translating {} file(s) from {} to {}",
        file_names.len(),
        config.source_language,
        config.target_language
    );

    let mut events = manager.subscribe();

    let params = {
        let mut params = TranslateFilesParams::new(
            file_names.iter().cloned().map(FileTask::new).collect(),
            config.source_language.clone(),
            config.target_language.clone(),
            api_key,
        )
        .with_custom_terms(custom_terms);

        let segment_size = options
            .segment_size
            .or(config.translation.default_segment_size);
        if let Some(segment_size) = segment_size {
            params = params.with_segment_size(segment_size);
        }

        params
    };

    let batch_id = manager
        .translate_files(params)
        .map_err(|e| anyhow!("Failed to start batch: {}", e))?;
    debug!("Started batch {}", batch_id);

    // Create a progress bar for batch tracking
    let progress_bar = ProgressBar::new(file_names.len() as u64);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result);
    progress_bar.set_message("Translating");

    // Drive the progress bar from the event channel; a first Ctrl-C requests
    // a graceful stop, the batch still finishes its in-flight file
    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(BatchEvent::Progress(message)) => {
                        progress_bar.set_message(message);
                    }
                    Ok(BatchEvent::FileCompleted { filename, success }) => {
                        progress_bar.inc(1);
                        if !success {
                            warn!("Translation failed for {}", filename);
                        }
                    }
                    Ok(BatchEvent::Error(message)) => {
                        error!("{}", message);
                    }
                    Ok(BatchEvent::BatchCompleted) => break,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Event subscriber lagged by {} event(s)", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, stopping after the current file...");
                manager.stop_translation();
            }
        }
    }

    progress_bar.finish_and_clear();

    match manager.join_batch().await {
        Some(outcome) => {
            info!(
                "Batch finished as {}: {} of {} files translated",
                outcome.state, outcome.succeeded, outcome.total
            );

            if outcome.state == BatchState::Failed {
                return Err(anyhow!("Translation batch failed"));
            }
        }
        None => warn!("No batch outcome available"),
    }

    Ok(())
}
