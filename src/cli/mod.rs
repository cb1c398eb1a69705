//! CLI entry point for Relista.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RelistaConfig;
use crate::error::RelistaError;

/// Relista chat CLI
#[derive(Parser, Debug)]
#[command(name = "relista", version, about = "Relista — streaming chat with tools")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with a model, streaming the answer
    Chat(ChatArgs),
    /// Generate a short title for a conversation opener
    Title(TitleArgs),
    /// Generate a greeting banner in the voice of the configured persona
    Greet(GreetArgs),
    /// List known models
    Models,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model id (defaults to the configured chat model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt (defaults to the configured instructions)
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Do not offer tools to the model
    #[arg(long)]
    pub no_tools: bool,

    /// User prompt (positional)
    pub prompt: Option<String>,
}

/// Arguments for the `title` subcommand.
#[derive(Parser, Debug)]
pub struct TitleArgs {
    /// Model id (defaults to the configured title model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// First user message of the conversation
    pub text: String,

    /// First assistant reply, if any
    #[arg(long)]
    pub reply: Option<String>,
}

/// Arguments for the `greet` subcommand.
#[derive(Parser, Debug)]
pub struct GreetArgs {
    /// Model id (defaults to the configured greeting model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Persona instructions (defaults to the configured instructions)
    #[arg(short, long)]
    pub persona: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve configuration from `--config` or the default location.
    pub fn load_config(&self) -> Result<RelistaConfig, RelistaError> {
        match &self.config {
            Some(path) => Ok(RelistaConfig::from_file(path)?.merge_env()),
            None => RelistaConfig::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chat_with_defaults() {
        let cli = Cli::try_parse_from(["relista", "chat", "hi"]).unwrap();
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Chat(args) => {
                assert!(args.model.is_none());
                assert!(args.system.is_none());
                assert!(!args.no_tools);
                assert_eq!(args.prompt.as_deref(), Some("hi"));
            }
            other => panic!("expected Chat, got {other:?}"),
        }
    }

    #[test]
    fn parse_chat_with_all_options() {
        let cli = Cli::try_parse_from([
            "relista",
            "chat",
            "-m",
            "mistral-large-latest",
            "-s",
            "You are helpful",
            "-t",
            "0.7",
            "--max-tokens",
            "1024",
            "--no-tools",
            "--config",
            "/tmp/relista.toml",
            "Hello world",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/relista.toml")));
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.model.as_deref(), Some("mistral-large-latest"));
                assert_eq!(args.system.as_deref(), Some("You are helpful"));
                assert!((args.temperature.unwrap() - 0.7).abs() < f64::EPSILON);
                assert_eq!(args.max_tokens, Some(1024));
                assert!(args.no_tools);
                assert_eq!(args.prompt.as_deref(), Some("Hello world"));
            }
            other => panic!("expected Chat, got {other:?}"),
        }
    }

    #[test]
    fn parse_title() {
        let cli = Cli::try_parse_from(["relista", "title", "How do I bake bread?"]).unwrap();
        match cli.command {
            Commands::Title(args) => {
                assert_eq!(args.text, "How do I bake bread?");
                assert!(args.reply.is_none());
            }
            other => panic!("expected Title, got {other:?}"),
        }
    }

    #[test]
    fn parse_greet_and_models() {
        let cli = Cli::try_parse_from(["relista", "greet", "-p", "Talk like a pirate."]).unwrap();
        match cli.command {
            Commands::Greet(args) => {
                assert!(args.model.is_none());
                assert_eq!(args.persona.as_deref(), Some("Talk like a pirate."));
            }
            other => panic!("expected Greet, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["relista", "models"]).unwrap();
        assert!(matches!(cli.command, Commands::Models));
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["relista"]).is_err());
    }

    #[test]
    fn parse_title_missing_text_is_error() {
        assert!(Cli::try_parse_from(["relista", "title"]).is_err());
    }
}
