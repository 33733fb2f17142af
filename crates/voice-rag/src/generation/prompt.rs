//! Message templates injected into conversations

use crate::retrieval::SearchHit;

/// Builds the system messages the orchestrator injects
pub struct PromptBuilder;

impl PromptBuilder {
    /// Context message carrying a matched document's full text
    pub fn context_message(prefix: &str, hit: &SearchHit<'_>) -> String {
        format!("{}\n{}", prefix, hit.document.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    #[test]
    fn test_context_message_layout() {
        let doc = Document::new("a.pdf", "cats purr", vec![1.0]);
        let hit = SearchHit { document: &doc, similarity: 0.9 };
        assert_eq!(
            PromptBuilder::context_message("Relevant document information:", &hit),
            "Relevant document information:\ncats purr"
        );
    }
}
