//! Draining a session into a complete response.

use futures::{Stream, StreamExt};

use crate::error::RelistaError;
use crate::types::{MessageAnnotation, StreamChunk};

/// Full text and citations of a finished session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub text: String,
    pub annotations: Vec<MessageAnnotation>,
}

/// Collect a session stream into a [`ChatResponse`].
pub async fn collect<S>(mut stream: S) -> Result<ChatResponse, RelistaError>
where
    S: Stream<Item = Result<StreamChunk, RelistaError>> + Unpin,
{
    let mut response = ChatResponse::default();

    while let Some(chunk) = stream.next().await {
        match chunk? {
            StreamChunk::Content(text) => response.text.push_str(&text),
            StreamChunk::Annotations(citations) => response.annotations.extend(citations),
        }
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UrlCitation;
    use futures::stream;

    #[tokio::test]
    async fn concatenates_content_and_keeps_citations() {
        let citation = MessageAnnotation::url(UrlCitation {
            url: "https://example.com".into(),
            title: Some("Example".into()),
            content: None,
            start_index: None,
            end_index: None,
        });
        let chunks = stream::iter(vec![
            Ok(StreamChunk::Content("Hel".into())),
            Ok(StreamChunk::Annotations(vec![citation.clone()])),
            Ok(StreamChunk::Content("lo".into())),
        ]);

        let response = collect(chunks).await.unwrap();
        assert_eq!(response.text, "Hello");
        assert_eq!(response.annotations, vec![citation]);
    }

    #[tokio::test]
    async fn surfaces_the_error() {
        let chunks = stream::iter(vec![
            Ok(StreamChunk::Content("partial".into())),
            Err(RelistaError::Stream("connection reset".into())),
        ]);

        let err = collect(chunks).await.unwrap_err();
        assert!(matches!(err, RelistaError::Stream(_)));
    }
}
