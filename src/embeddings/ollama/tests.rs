use super::*;
use crate::config::{Config, OllamaConfig, RetrievalConfig};
use std::path::PathBuf;

fn test_config() -> Config {
    Config {
        ollama: OllamaConfig {
            protocol: "http".to_string(),
            host: "test-host".to_string(),
            port: 1234,
            chat_model: "test-chat".to_string(),
            embedding_model: "test-embed".to_string(),
            batch_size: 128,
        },
        retrieval: RetrievalConfig::default(),
        data_dir: PathBuf::from("data"),
        base_dir: PathBuf::new(),
    }
}

#[test]
fn client_uses_embedding_model_from_config() {
    let client = OllamaClient::new(&test_config()).expect("Failed to create client");

    assert_eq!(client.model, "test-embed");
    assert_eq!(client.batch_size, 128);
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
    assert_eq!(client.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
}

#[test]
fn client_builder_methods() {
    let client = OllamaClient::new(&test_config())
        .expect("Failed to create client")
        .with_timeout(Duration::from_secs(60))
        .with_retry_attempts(5);

    assert_eq!(client.retry_attempts, 5);
}

#[test]
fn embed_batch_on_empty_input_is_a_no_op() {
    let client = OllamaClient::new(&test_config()).expect("Failed to create client");

    // Must not touch the network for an empty input
    let result = client.embed_batch(&[]).expect("empty batch should succeed");
    assert!(result.is_empty());
}
