//! Collects citation annotations as they stream in.

use crate::types::MessageAnnotation;

/// Ordered citation list for one session.
///
/// Citations are positional and never merged or de-duplicated. `drain`
/// hands out what arrived since the previous drain so the session can
/// forward it between content chunks.
#[derive(Debug, Default)]
pub struct AnnotationCollector {
    all: Vec<MessageAnnotation>,
    pending: usize,
}

impl AnnotationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, citations: Vec<MessageAnnotation>) {
        self.pending += citations.len();
        self.all.extend(citations);
    }

    /// Citations received since the last drain.
    pub fn drain(&mut self) -> Vec<MessageAnnotation> {
        let start = self.all.len() - self.pending;
        self.pending = 0;
        self.all[start..].to_vec()
    }

    /// Every citation received so far, in arrival order.
    pub fn collected(&self) -> &[MessageAnnotation] {
        &self.all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UrlCitation;

    fn citation(url: &str) -> MessageAnnotation {
        MessageAnnotation::url(UrlCitation {
            url: url.into(),
            title: None,
            content: None,
            start_index: None,
            end_index: None,
        })
    }

    #[test]
    fn drain_returns_only_new_citations() {
        let mut collector = AnnotationCollector::new();
        collector.ingest(vec![citation("https://a"), citation("https://b")]);
        assert_eq!(collector.drain().len(), 2);
        assert!(collector.drain().is_empty());

        collector.ingest(vec![citation("https://a")]);
        assert_eq!(collector.drain(), vec![citation("https://a")]);
        assert_eq!(collector.collected().len(), 3);
    }
}
