
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::CeylonError;
use crate::config::Config;
use crate::corpus::CorpusRecord;
use crate::embeddings::OllamaClient;
use crate::generation::ChatClient;
use crate::index::{self, VectorIndex};
use crate::prompt::{self, NO_CONTEXT_REPLY};
use crate::smalltalk::{is_small_talk, small_talk_reply};

/// Request-time service owning the loaded index, metadata, and both HTTP
/// clients. Constructed once and reused for the lifetime of the process.
#[derive(Debug)]
pub struct Assistant {
    embedder: OllamaClient,
    chat: ChatClient,
    index: VectorIndex,
    corpus: Vec<CorpusRecord>,
    top_k: usize,
}

/// Map index positions back to chunk texts through the order-aligned
/// metadata. Out-of-range or sentinel positions are silently dropped.
fn map_positions(positions: &[usize], corpus: &[CorpusRecord]) -> Vec<String> {
    positions
        .iter()
        .filter_map(|&pos| corpus.get(pos).map(|record| record.text.clone()))
        .collect()
}

impl Assistant {
    /// Load the persisted artifacts and construct the service.
    /// Fails with a build hint if the artifacts are missing.
    #[inline]
    pub fn load(config: &Config) -> Result<Self> {
        let index_path = config.index_path();
        let metadata_path = config.metadata_path();

        if !index_path.exists() || !metadata_path.exists() {
            return Err(CeylonError::Index(format!(
                "Index not found in {}. Run `ceylontrip build` first.",
                config.index_dir().display()
            ))
            .into());
        }

        let index = VectorIndex::load(&index_path)?;
        let corpus = index::load_metadata(&metadata_path)?;

        let embedder = OllamaClient::new(config).context("Failed to create embedding client")?;
        let chat = ChatClient::new(config).context("Failed to create chat client")?;

        info!("Assistant ready with {} corpus chunks", corpus.len());

        Ok(Self {
            embedder,
            chat,
            index,
            corpus,
            top_k: config.retrieval.top_k,
        })
    }

    /// Retrieve the texts of the `top_k` most similar chunks.
    /// Returns at most min(top_k, corpus size) texts; no relevance threshold.
    #[inline]
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        if self.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_vector = self
            .embedder
            .embed(query)
            .context("Failed to embed query")?;
        // Query vectors are normalized like corpus vectors so the index
        // distance ranking matches cosine similarity.
        index::normalize(&mut query_vector);

        let k = top_k.min(self.corpus.len());
        let positions = self.index.search(&query_vector, k);
        let chunks = map_positions(&positions, &self.corpus);

        debug!(
            "Retrieved {} chunks for query (top_k: {})",
            chunks.len(),
            top_k
        );
        Ok(chunks)
    }

    /// Answer one question: small talk short-circuits to a canned reply,
    /// empty retrieval short-circuits to the fixed refusal, otherwise the
    /// grounded prompt goes to the generation endpoint.
    #[inline]
    pub fn answer(&self, question: &str) -> Result<String> {
        if is_small_talk(question) {
            debug!("Classified as small talk, skipping retrieval");
            return Ok(small_talk_reply(question).to_string());
        }

        let context_chunks = self.retrieve(question, self.top_k)?;

        if context_chunks.is_empty() {
            debug!("No grounding context retrieved, returning fixed refusal");
            return Ok(NO_CONTEXT_REPLY.to_string());
        }

        let messages = prompt::build_messages(&context_chunks, question);
        self.chat.chat(&messages)
    }
}
