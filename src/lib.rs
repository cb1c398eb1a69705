//! Relista — streaming chat completions with tool calling.
//!
//! Opens a streaming chat-completion request against an OpenAI-compatible
//! endpoint, forwards content and citations as they arrive, and when the
//! model asks for tools, runs them and streams the follow-up answer into
//! the same output.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use relista::prelude::*;
//!
//! # async fn example() -> relista::error::Result<()> {
//! let config = RelistaConfig::load()?;
//! let transport = Arc::new(OpenAiCompatibleTransport::from_config(&config)?);
//! let session = StreamSession::new(transport);
//!
//! let transcript = Transcript::new(vec![Message::user("Hello!")]);
//! let (mut stream, _cancel) = session.start(transcript, CapabilitySet::new(), config.model());
//! while let Some(chunk) = stream.next().await {
//!     if let StreamChunk::Content(text) = chunk? {
//!         print!("{text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
