use thiserror::Error;

pub type Result<T> = std::result::Result<T, CeylonError>;

#[derive(Error, Debug)]
pub enum CeylonError {
    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod assistant;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod generation;
pub mod index;
pub mod prompt;
pub mod smalltalk;
