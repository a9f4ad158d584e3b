// tunechat - terminal chat client that collects rated conversations
// Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tunechat::cli::Repl;
use tunechat::config::{load_config, Config, ConfigOverrides};
use tunechat::conversation::ConversationTracker;
use tunechat::providers::{create_provider, TextGenerator};
use tunechat::storage::{open_store, SaveMode, StorageFormat};

#[derive(Parser)]
#[command(name = "tunechat", version, about = "Chat with Gemini and collect rated conversations for fine-tuning")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.tunechat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model to use
    #[arg(long, global = true)]
    model: Option<String>,

    /// Background context file prepended to every prompt
    #[arg(long, global = true)]
    background: Option<PathBuf>,

    /// Transcript file format: csv or json
    #[arg(long, global = true)]
    store_format: Option<StorageFormat>,

    /// Transcript file path
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    /// What to save: condensed (first question, last answer) or full
    #[arg(long, global = true)]
    save_mode: Option<SaveMode>,

    /// Never offer to save the conversation
    #[arg(long, global = true)]
    no_save: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Send one prompt without history and print the reply
    Ask {
        /// Prompt text
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            model: self.model.clone(),
            background_file: self.background.clone(),
            store_format: self.store_format,
            store_path: self.store_path.clone(),
            save_mode: self.save_mode,
            no_save: self.no_save,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tunechat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli.overrides())?;

    match cli.command {
        Some(Commands::Ask { prompt }) => ask(&config, &prompt.join(" ")).await,
        Some(Commands::Chat) | None => chat(&config).await,
    }
}

async fn ask(config: &Config, prompt: &str) -> Result<()> {
    let provider = create_provider(config)?;
    let reply = provider.generate(prompt).await?;
    println!("{}", reply);
    Ok(())
}

async fn chat(config: &Config) -> Result<()> {
    let tracker = ConversationTracker::new(create_provider(config)?);

    let store = if config.storage.enabled {
        let path = config.storage.resolved_path();
        let store = open_store(config.storage.format, &path)
            .with_context(|| format!("Failed to open transcript store {}", path.display()))?;
        Some(store)
    } else {
        None
    };

    let mut repl = Repl::new(tracker, store, config.storage.mode);
    repl.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_flags_after_chat_subcommand() {
        let cli = Cli::try_parse_from([
            "tunechat",
            "chat",
            "--no-save",
            "--store-format",
            "json",
            "--store-path",
            "out.json",
            "--save-mode",
            "full",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert!(overrides.no_save);
        assert_eq!(overrides.store_format, Some(StorageFormat::Json));
        assert_eq!(overrides.store_path, Some(PathBuf::from("out.json")));
        assert_eq!(overrides.save_mode, Some(SaveMode::Full));
    }

    #[test]
    fn test_store_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["tunechat", "--no-save", "chat"]).unwrap();
        assert!(cli.overrides().no_save);
        assert!(matches!(cli.command, Some(Commands::Chat)));
    }
}
