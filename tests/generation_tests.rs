//! Greeting and title generation over a scripted transport.

mod common;

use pretty_assertions::assert_eq;

use common::*;
use relista::chat::StreamSession;
use relista::config::RelistaConfig;
use relista::generation::{generate_greeting, generate_title, GREETING_TEMPERATURE};
use relista::types::{Message, Role};

#[tokio::test]
async fn greeting_uses_persona_without_tools_and_is_sanitized() {
    let transport = ScriptedTransport::new();
    transport.queue_lines(vec![
        content("\"*tips hat* Ahoy,"),
        content("\nmatey!\""),
        finish("stop"),
        done(),
    ]);
    let session = StreamSession::new(transport.clone());
    let config = RelistaConfig::new()
        .with_instructions("Be plain.")
        .with_user_name("Ada");

    let greeting = generate_greeting(&session, &config, Some("Talk like a pirate."), "ministral-8b-latest")
        .await
        .unwrap();

    assert_eq!(greeting, "Ahoy, matey!");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model, "ministral-8b-latest");
    assert!(request.tools.is_none());
    assert_eq!(request.settings.temperature, Some(GREETING_TEMPERATURE));

    let messages = request.transcript.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[0].content.contains("Talk like a pirate."));
    assert!(!messages[0].content.contains("Be plain."));
    assert!(messages[0].content.contains("User-specified name: Ada"));
}

#[tokio::test]
async fn greeting_falls_back_to_default_instructions() {
    let transport = ScriptedTransport::new();
    transport.queue_lines(vec![content("Hi there"), done()]);
    let session = StreamSession::new(transport.clone());
    let config = RelistaConfig::new().with_instructions("Be plain.");

    let greeting = generate_greeting(&session, &config, None, "m").await.unwrap();

    assert_eq!(greeting, "Hi there");
    let prompt = transport.requests()[0].transcript.messages()[0].content.clone();
    assert!(prompt.contains("-- PERSONA SYSTEM PROMPT --\nBe plain.\n"));
}

#[tokio::test]
async fn title_is_generated_from_conversation_turns() {
    let transport = ScriptedTransport::new();
    transport.queue_lines(vec![content("**Bread   Baking**"), done()]);
    let session = StreamSession::new(transport.clone());
    let history = vec![
        Message::user("How do I bake bread?"),
        Message::assistant("Start with flour."),
    ];

    let title = generate_title(&session, &history, "ministral-3b-latest").await.unwrap();

    assert_eq!(title, "Bread Baking");
    let request = &transport.requests()[0];
    assert!(request.tools.is_none());
    assert_eq!(request.transcript.len(), 3);
}
