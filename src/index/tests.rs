use super::*;
use crate::corpus::SourceKind;
use tempfile::TempDir;

fn unit(norm_target: &[f32]) -> Vec<f32> {
    let mut v = norm_target.to_vec();
    normalize(&mut v);
    v
}

#[test]
fn normalize_produces_unit_vectors() {
    let mut v = vec![3.0, 4.0];
    normalize(&mut v);

    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
    assert!((v[0] - 0.6).abs() < 1e-5);
    assert!((v[1] - 0.8).abs() < 1e-5);
}

#[test]
fn normalize_zero_vector_stays_finite() {
    let mut v = vec![0.0_f32; 4];
    normalize(&mut v);

    assert!(v.iter().all(|x| x.is_finite()));
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn search_ranks_by_inner_product() {
    let vectors = vec![
        unit(&[1.0, 0.0, 0.0]),
        unit(&[0.0, 1.0, 0.0]),
        unit(&[0.0, 0.0, 1.0]),
    ];
    let index = VectorIndex::build(&vectors).expect("build should succeed");

    let query = unit(&[0.1, 1.0, 0.1]);
    let hits = index.search(&query, 2);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0], 1);
}

#[test]
fn search_orders_hits_most_similar_first() {
    let vectors = vec![
        unit(&[1.0, 0.0, 0.0]),
        unit(&[0.0, 1.0, 0.0]),
        unit(&[0.707, 0.707, 0.0]),
    ];
    let index = VectorIndex::build(&vectors).expect("build should succeed");

    // Full ranking by cosine similarity: exact direction, diagonal, orthogonal
    let query = unit(&[0.0, 1.0, 0.05]);
    let hits = index.search(&query, 3);
    assert_eq!(hits, vec![1, 2, 0]);
}

#[test]
fn search_never_returns_more_than_corpus_size() {
    let vectors = vec![unit(&[1.0, 0.0]), unit(&[0.0, 1.0])];
    let index = VectorIndex::build(&vectors).expect("build should succeed");

    let hits = index.search(&unit(&[1.0, 1.0]), 10);
    assert!(hits.len() <= 2);
    assert!(hits.iter().all(|&pos| pos < 2));
}

#[test]
fn build_rejects_empty_input() {
    let result = VectorIndex::build(&[]);
    assert!(result.is_err());
}

#[test]
fn build_rejects_mismatched_dimensions() {
    let result = VectorIndex::build(&[vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]);
    let err = result.expect_err("mismatched dimensions should fail");
    assert!(err.to_string().contains("dimension"));
}

#[test]
fn save_and_load_preserve_search_results() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("corpus.idx");

    let vectors = vec![
        unit(&[1.0, 0.0, 0.0]),
        unit(&[0.0, 1.0, 0.0]),
        unit(&[0.7, 0.7, 0.0]),
    ];
    let mut index = VectorIndex::build(&vectors).expect("build should succeed");

    let query = unit(&[0.9, 0.1, 0.0]);
    let before = index.search(&query, 3);

    index.save(&path).expect("save should succeed");
    let reloaded = VectorIndex::load(&path).expect("load should succeed");
    let after = reloaded.search(&query, 3);

    assert_eq!(before, after);
}

#[test]
fn load_fails_for_missing_file() {
    let dir = TempDir::new().expect("tempdir");

    let result = VectorIndex::load(&dir.path().join("nope.idx"));
    let err = result.expect_err("missing file should fail");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn load_fails_for_corrupt_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("corpus.idx");
    std::fs::write(&path, b"definitely not a serialized index").expect("write garbage");

    let result = VectorIndex::load(&path);
    let err = result.expect_err("corrupt file should fail");
    assert!(err.to_string().contains("corrupt"));
}

#[test]
fn metadata_roundtrip_preserves_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("meta.json");

    let corpus = vec![
        crate::corpus::CorpusRecord {
            id: "dest_ella".to_string(),
            source: SourceKind::Destinations,
            text: "[DESTINATION] Ella".to_string(),
        },
        crate::corpus::CorpusRecord {
            id: "tips_00".to_string(),
            source: SourceKind::Tips,
            text: "[TIPS] General travel tips".to_string(),
        },
    ];

    save_metadata(&path, &corpus).expect("save should succeed");
    let loaded = load_metadata(&path).expect("load should succeed");

    assert_eq!(loaded, corpus);
}
