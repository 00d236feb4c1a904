//! Report question answering: retrieve the closest passage, then complete.

use fundamentals_core::{FundamentalsError, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    chunk::DEFAULT_CHUNK_SIZE,
    index::{Embedder, VectorIndex},
    prompt::{CompletionModel, PromptTemplate},
};

/// Answers a question about a report from its single most relevant passage.
#[derive(Debug, Clone)]
pub struct InsightPipeline {
    embedder: Arc<dyn Embedder>,
    model: Arc<dyn CompletionModel>,
    template: PromptTemplate,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl InsightPipeline {
    /// Create a pipeline with the default chunking (1000 characters, no overlap).
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            embedder,
            model,
            template: PromptTemplate,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: 0,
        }
    }

    /// Override chunk size and overlap, in characters.
    #[must_use]
    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Indexes the report, retrieves the top passage for `query` and asks the model.
    pub async fn summarize(&self, document: &str, query: &str) -> Result<String> {
        let index = VectorIndex::embed_and_index(
            self.embedder.as_ref(),
            document,
            self.chunk_size,
            self.chunk_overlap,
        )
        .await?;

        let passage = index
            .similarity_search(self.embedder.as_ref(), query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                FundamentalsError::MalformedPayload("report contains no text".to_string())
            })?;

        debug!(
            chunks = index.len(),
            score = passage.score,
            "Retrieved passage"
        );

        let answer = self
            .model
            .complete(&self.template.render(&passage.text, query))
            .await?;

        info!(length = answer.len(), "Generated report insights");
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::KeywordEmbedder;
    use crate::prompt::DEFAULT_QUERY;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed reply.
    #[derive(Debug, Default)]
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionModel for RecordingModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("  - Revenue grew year over year  \n".to_string())
        }
    }

    #[tokio::test]
    async fn test_summarize_uses_top_passage() {
        let model = Arc::new(RecordingModel::default());
        let pipeline = InsightPipeline::new(Arc::new(KeywordEmbedder), model.clone())
            .with_chunking(80, 0);

        let report = "Our employees numbered 317,240 at year end.\n\n\
                      Revenue growth was 4.7% and revenue reached 1.5 trillion.\n\n\
                      We carry no long-term debt.";
        let answer = pipeline
            .summarize(report, "Describe revenue growth")
            .await
            .unwrap();

        assert_eq!(answer, "- Revenue grew year over year");
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Revenue growth was 4.7%"));
        assert!(!prompts[0].contains("317,240"));
        assert!(prompts[0].contains("Describe revenue growth"));
    }

    #[tokio::test]
    async fn test_empty_report_is_error() {
        let pipeline = InsightPipeline::new(
            Arc::new(KeywordEmbedder),
            Arc::new(RecordingModel::default()),
        );
        let err = pipeline.summarize("\n\n", DEFAULT_QUERY).await.unwrap_err();
        assert!(err.is_malformed());
    }
}
