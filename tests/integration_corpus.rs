#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

use ceylontrip::corpus::{CorpusPaths, SourceKind, build_corpus};
use ceylontrip::index::{VectorIndex, load_metadata, normalize, save_metadata};
use std::fs;
use tempfile::TempDir;

const DESTINATIONS_CSV: &str = "\
name,region,types,best_months,recommended_days,highlights,vibe,description
Ella,Hill Country,\"nature, hiking\",Jan-Apr,2-3,\"Nine Arches Bridge, Little Adam's Peak\",laid-back,A small town in the misty hills.
Galle Fort,South Coast,\"history, culture\",Dec-Apr,1-2,\"Dutch fort, lighthouse\",romantic,A fortified old town by the sea.
Mirissa,South Coast,\"beach, wildlife\",Nov-Apr,2-3,\"Whale watching, Coconut Tree Hill\",relaxed,A beach town famous for blue whales.
";

const ROUTES_CSV: &str = "\
from,to,transport,hours_min,hours_max,scenic,notes
Kandy,Ella,train,6,7,yes,Book reserved seats early.
Colombo,Galle Fort,train,2,3,yes,Coastal line along the sea.
";

const TIPS_MD: &str = "\
Carry small bills for tuk-tuks.

## Transport

Trains are slow but scenic.

## Money

ATMs are common in towns.
";

fn fixture_dir() -> (TempDir, CorpusPaths) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let paths = CorpusPaths {
        destinations: dir.path().join("destinations.csv"),
        routes: dir.path().join("routes.csv"),
        tips: dir.path().join("tips.md"),
    };
    fs::write(&paths.destinations, DESTINATIONS_CSV).expect("Failed to write destinations");
    fs::write(&paths.routes, ROUTES_CSV).expect("Failed to write routes");
    fs::write(&paths.tips, TIPS_MD).expect("Failed to write tips");
    (dir, paths)
}

#[test]
fn full_corpus_loads_in_source_order() {
    let (_dir, paths) = fixture_dir();

    let corpus = build_corpus(&paths).expect("Failed to build corpus");

    // 3 destinations, 2 routes, 3 tips sections (pre-heading included)
    assert_eq!(corpus.len(), 8);

    let sources: Vec<SourceKind> = corpus.iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        vec![
            SourceKind::Destinations,
            SourceKind::Destinations,
            SourceKind::Destinations,
            SourceKind::Routes,
            SourceKind::Routes,
            SourceKind::Tips,
            SourceKind::Tips,
            SourceKind::Tips,
        ]
    );

    assert_eq!(corpus[0].id, "dest_ella");
    assert_eq!(corpus[1].id, "dest_galle_fort");
    assert_eq!(corpus[3].id, "route_kandy_ella");
    assert_eq!(corpus[5].id, "tips_00");
    assert!(corpus[5].text.starts_with("[TIPS] General travel tips"));
    assert!(corpus[3].text.contains("Approx time: 6–7 hours"));
}

#[test]
fn corpus_survives_a_metadata_roundtrip() {
    let (dir, paths) = fixture_dir();

    let corpus = build_corpus(&paths).expect("Failed to build corpus");
    let metadata_path = dir.path().join("meta.json");

    save_metadata(&metadata_path, &corpus).expect("Failed to save metadata");
    let reloaded = load_metadata(&metadata_path).expect("Failed to load metadata");

    assert_eq!(corpus, reloaded);
}

#[test]
fn persisted_index_ranks_like_the_in_memory_one() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut vectors = vec![
        vec![1.0_f32, 0.1, 0.0],
        vec![0.0, 1.0, 0.1],
        vec![0.1, 0.0, 1.0],
    ];
    for v in &mut vectors {
        normalize(v);
    }

    let mut index = VectorIndex::build(&vectors).expect("Failed to build index");
    let mut query = vec![0.05_f32, 0.9, 0.1];
    normalize(&mut query);

    let before = index.search(&query, 2);
    assert_eq!(before[0], 1);

    let index_path = dir.path().join("corpus.idx");
    index.save(&index_path).expect("Failed to save index");
    let reloaded = VectorIndex::load(&index_path).expect("Failed to load index");

    assert_eq!(reloaded.search(&query, 2), before);
}

#[test]
fn missing_sources_are_skipped_but_an_empty_corpus_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let paths = CorpusPaths {
        destinations: dir.path().join("destinations.csv"),
        routes: dir.path().join("routes.csv"),
        tips: dir.path().join("tips.md"),
    };

    let err = build_corpus(&paths).expect_err("Empty corpus should fail");
    assert!(err.to_string().contains("No data found"));

    fs::write(&paths.tips, "Only general tips here.").expect("Failed to write tips");
    let corpus = build_corpus(&paths).expect("Tips-only corpus should load");
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus[0].source, SourceKind::Tips);
}
