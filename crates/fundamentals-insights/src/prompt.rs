//! Completion models and the report-question prompt.

use async_trait::async_trait;
use fundamentals_core::Result;
use std::fmt::Debug;

/// A language model that completes a prompt.
#[async_trait]
pub trait CompletionModel: Send + Sync + Debug {
    /// Returns the model's answer to `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Question asked of every report unless the caller supplies one.
pub const DEFAULT_QUERY: &str = "How has the performance been in this year compared to last year?";

const TEMPLATE: &str = "\
You are a chatbot that answers questions about a company's financials using only the context below.

Context:
{context}

Question: {query}

Answer briefly and accurately in bullet points. Use only the context above; \
do not invent figures, events or facts that it does not state. \
If the context does not answer the question, say so. \
Leave out stray characters and symbols.";

/// Renders the fixed report-question prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct PromptTemplate;

impl PromptTemplate {
    /// Fills the template with the retrieved passage and the question.
    #[must_use]
    pub fn render(&self, context: &str, query: &str) -> String {
        TEMPLATE
            .replace("{query}", query.trim())
            .replace("{context}", context.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_carries_context_and_query() {
        let prompt = PromptTemplate.render("  Revenue rose 4.7%.  ", DEFAULT_QUERY);
        assert!(prompt.contains("Context:\nRevenue rose 4.7%.\n"));
        assert!(prompt.contains(&format!("Question: {DEFAULT_QUERY}")));
        assert!(prompt.contains("do not invent"));
        assert!(!prompt.contains("{context}"));
    }
}
