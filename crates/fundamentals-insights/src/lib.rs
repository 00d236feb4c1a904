#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Passage retrieval and language-model summaries of annual reports.
//!
//! - [`chunk_text`](chunk::chunk_text) - Paragraph-boundary chunker
//! - [`VectorIndex`](index::VectorIndex) - In-memory cosine-similarity index
//! - [`PromptTemplate`](prompt::PromptTemplate) - The fixed report-question prompt
//! - [`OpenAiClient`](openai::OpenAiClient) - Embeddings and chat completions
//! - [`InsightPipeline`](pipeline::InsightPipeline) - Retrieve then complete

/// Paragraph-boundary text chunker.
pub mod chunk;
/// Embeddings and an in-memory vector index.
pub mod index;
/// OpenAI-compatible embeddings and chat completions.
pub mod openai;
/// Retrieve-then-complete pipeline.
pub mod pipeline;
/// Completion models and the report-question prompt.
pub mod prompt;

pub use chunk::{DEFAULT_CHUNK_SIZE, chunk_text};
pub use index::{EMBED_BATCH_SIZE, Embedder, Passage, VectorIndex, cosine_similarity};
pub use openai::OpenAiClient;
pub use pipeline::InsightPipeline;
pub use prompt::{CompletionModel, DEFAULT_QUERY, PromptTemplate};
