//! Relista CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use futures::StreamExt;
use relista::chat::{SessionEvent, SessionEventPayload, StreamSession};
use relista::cli::{ChatArgs, Cli, Commands, GreetArgs, TitleArgs};
use relista::config::RelistaConfig;
use relista::generation::{assemble_transcript, generate_greeting, generate_title, system_prompt};
use relista::models::MODELS;
use relista::provider::OpenAiCompatibleTransport;
use relista::tools::builtin::InMemoryStore;
use relista::tools::{CapabilitySet, ToolRegistry};
use relista::types::{GenerationSettings, Message, StreamChunk};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let result = match cli.load_config() {
        Ok(config) => match cli.command {
            Commands::Chat(args) => handle_chat(config, args).await,
            Commands::Title(args) => handle_title(config, args).await,
            Commands::Greet(args) => handle_greet(config, args).await,
            Commands::Models => {
                handle_models(&config);
                Ok(())
            }
        },
        Err(err) => Err(err.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_chat(config: RelistaConfig, args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let Some(prompt) = args.prompt else {
        eprintln!("Usage: relista chat \"your prompt here\"");
        std::process::exit(1);
    };

    let memory = Arc::new(InMemoryStore::new());
    let capabilities = if args.no_tools {
        CapabilitySet::new()
    } else {
        ToolRegistry::standard(&config, memory.clone(), None).capabilities_for(None)
    };

    let system = system_prompt(&config, args.system.as_deref(), memory.as_ref(), None)?;
    let transcript = assemble_transcript(&system, vec![Message::user(prompt)]);

    let settings = GenerationSettings::builder()
        .maybe_temperature(args.temperature)
        .maybe_max_tokens(args.max_tokens)
        .build();

    let sink = Arc::new(|event: SessionEvent| match &event.payload {
        SessionEventPayload::ToolStarted { name, summary, .. } => {
            eprintln!("\n⚡ {name}: {summary}");
        }
        SessionEventPayload::ToolFinished { name, is_error: true, .. } => {
            eprintln!("  ❌ {name} failed");
        }
        _ => {}
    });

    let transport = Arc::new(OpenAiCompatibleTransport::from_config(&config)?);
    let session = StreamSession::new(transport)
        .with_settings(settings)
        .with_event_sink(sink);
    let model = args.model.unwrap_or_else(|| config.model());

    let (mut stream, cancel) = session.start(transcript, capabilities, model);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    while let Some(chunk) = stream.next().await {
        match chunk? {
            StreamChunk::Content(text) => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
            StreamChunk::Annotations(citations) => {
                for citation in citations.iter().filter_map(|a| a.url_citation.as_ref()) {
                    eprintln!("\n[{}]", citation.url);
                }
            }
        }
    }

    println!(); // newline after streaming
    Ok(())
}

async fn handle_title(config: RelistaConfig, args: TitleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = vec![Message::user(args.text)];
    if let Some(reply) = args.reply {
        history.push(Message::assistant(reply));
    }

    let transport = Arc::new(OpenAiCompatibleTransport::from_config(&config)?);
    let session = StreamSession::new(transport);
    let model = args.model.unwrap_or_else(|| config.title_model());

    println!("{}", generate_title(&session, &history, &model).await?);
    Ok(())
}

async fn handle_greet(config: RelistaConfig, args: GreetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(OpenAiCompatibleTransport::from_config(&config)?);
    let session = StreamSession::new(transport);
    let model = args.model.unwrap_or_else(|| config.greeting_model());

    let greeting = generate_greeting(&session, &config, args.persona.as_deref(), &model).await?;
    println!("{greeting}");
    Ok(())
}

fn handle_models(config: &RelistaConfig) {
    let current = config.model();
    for model in MODELS {
        let marker = if model.id == current { "*" } else { " " };
        println!("{marker} {:<20} {}", model.name, model.id);
    }
}
