#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use hora::core::ann_index::{ANNIndex, SerializableIndex};
use hora::core::metrics::Metric;
use hora::index::bruteforce_idx::BruteForceIndex;
use hora::index::bruteforce_params::BruteForceParams;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::CeylonError;
use crate::config::Config;
use crate::corpus::{self, CorpusPaths, CorpusRecord};
use crate::embeddings::OllamaClient;

/// Floor for the L2 norm denominator, so a zero vector stays finite
pub const NORM_EPSILON: f32 = 1e-12;

/// Flat cosine-similarity index over the unit-normalized corpus embeddings.
/// Ascending Euclidean distance over unit vectors matches descending cosine
/// similarity, so hora's smaller-is-closer ordering ranks best matches first.
/// Positions handed back by `search` are corpus positions; the caller maps
/// them through the order-aligned metadata list.
#[derive(Debug)]
pub struct VectorIndex {
    index: BruteForceIndex<f32, usize>,
}

/// Outcome of an offline index build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub records: usize,
    pub dimension: usize,
}

/// Scale a vector to unit L2 norm in place
#[inline]
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt() + NORM_EPSILON;
    for v in vector.iter_mut() {
        *v /= norm;
    }
}

impl VectorIndex {
    /// Build a flat index over unit-normalized vectors, in the given order
    #[inline]
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(CeylonError::Index("Cannot build an empty index".to_string()).into());
        };
        let dimension = first.len();

        let mut index =
            BruteForceIndex::<f32, usize>::new(dimension, &BruteForceParams::default());

        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(CeylonError::Index(format!(
                    "Vector at position {} has dimension {} (expected {})",
                    position,
                    vector.len(),
                    dimension
                ))
                .into());
            }
            index
                .add(vector, position)
                .map_err(|e| CeylonError::Index(format!("Failed to insert vector: {e}")))?;
        }

        index
            .build(Metric::Euclidean)
            .map_err(|e| CeylonError::Index(format!("Failed to build index: {e}")))?;

        debug!(
            "Built flat index over {} unit vectors ({} dimensions)",
            vectors.len(),
            dimension
        );
        Ok(Self { index })
    }

    /// Return the positions of the `k` most similar vectors, best match first.
    /// The query must be unit-normalized like the indexed vectors.
    #[inline]
    pub fn search(&self, query: &[f32], k: usize) -> Vec<usize> {
        self.index.search(query, k)
    }

    /// Persist the index as an opaque binary file, overwriting any prior one
    #[inline]
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| CeylonError::Index(format!("Non-UTF8 index path: {}", path.display())))?;
        self.index
            .dump(path_str)
            .map_err(|e| CeylonError::Index(format!("Failed to write index file: {e}")))?;
        Ok(())
    }

    /// Read a previously dumped index back from disk. Missing and corrupt
    /// files surface as errors; hora panics on both, so the call is isolated
    /// behind an existence check and an unwind boundary.
    #[inline]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(
                CeylonError::Index(format!("Index file not found: {}", path.display())).into(),
            );
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| CeylonError::Index(format!("Non-UTF8 index path: {}", path.display())))?;
        let index = std::panic::catch_unwind(|| BruteForceIndex::<f32, usize>::load(path_str))
            .map_err(|_| {
                CeylonError::Index(format!(
                    "Index file is corrupt or incompatible: {}",
                    path.display()
                ))
            })?
            .map_err(|e| CeylonError::Index(format!("Failed to read index file: {e}")))?;
        Ok(Self { index })
    }
}

/// Write the full corpus as the metadata artifact, order-aligned with the index
#[inline]
pub fn save_metadata(path: &Path, corpus: &[CorpusRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(corpus).context("Failed to serialize metadata")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    Ok(())
}

#[inline]
pub fn load_metadata(path: &Path) -> Result<Vec<CorpusRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse metadata file")
}

/// Offline, wholesale index rebuild: load corpus, embed, normalize, persist.
/// Running it again overwrites the prior artifacts.
#[inline]
pub fn build_index(config: &Config) -> Result<BuildSummary> {
    let paths = CorpusPaths::from_config(config);
    let records = corpus::build_corpus(&paths)?;

    let client = OllamaClient::new(config).context("Failed to create Ollama client")?;

    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    info!("Embedding {} corpus chunks", texts.len());

    let bar = if console::user_attended_stderr() {
        ProgressBar::new(texts.len() as u64).with_style(
            ProgressStyle::with_template("{bar:40} [{pos}/{len}] Embedding corpus")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
    for batch in texts.chunks(config.ollama.batch_size as usize) {
        let embedded = client
            .embed_batch(batch)
            .context("Failed to embed corpus batch")?;
        bar.inc(embedded.len() as u64);
        vectors.extend(embedded);
    }
    bar.finish_and_clear();

    for vector in &mut vectors {
        normalize(vector);
    }
    let dimension = vectors.first().map_or(0, Vec::len);

    let mut index = VectorIndex::build(&vectors)?;

    fs::create_dir_all(config.index_dir()).with_context(|| {
        format!(
            "Failed to create index directory: {}",
            config.index_dir().display()
        )
    })?;

    index.save(&config.index_path())?;
    save_metadata(&config.metadata_path(), &records)?;

    info!(
        "Persisted index ({} records, {} dimensions) to {}",
        records.len(),
        dimension,
        config.index_dir().display()
    );

    Ok(BuildSummary {
        records: records.len(),
        dimension,
    })
}
