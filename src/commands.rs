use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::corpus::SourceKind;
use crate::embeddings::OllamaClient;
use crate::index;

/// Build the similarity index from the corpus source files
#[inline]
pub fn build_index() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    println!("Building corpus index from {}", config.data_dir.display());

    let summary = index::build_index(&config)?;

    println!("Index build completed successfully!");
    println!("  Corpus chunks embedded: {}", summary.records);
    println!("  Embedding dimensions: {}", summary.dimension);
    println!("  Index file: {}", config.index_path().display());
    println!("  Metadata file: {}", config.metadata_path().display());

    Ok(())
}

/// Run the interactive chat loop on stdin/stdout
#[inline]
pub fn run_chat() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let assistant = Assistant::load(&config)?;

    println!("CeylonTrip ready. Ask me about traveling in Sri Lanka!");
    println!("(press Enter on an empty line to exit)");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        // EOF ends the session the same way a blank line does
        let Some(line) = lines.next() else {
            println!();
            println!("Bye!");
            break;
        };
        let question = line.context("Failed to read input")?;
        let question = question.trim();

        if question.is_empty() {
            println!("Bye!");
            break;
        }

        println!("Thinking...");
        match assistant.answer(question) {
            Ok(reply) => println!("CeylonTrip: {reply}"),
            Err(e) => println!("[Error] {e:#}"),
        }
        println!();
    }

    Ok(())
}

/// Answer a single question and exit
#[inline]
pub fn ask(question: &str) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let assistant = Assistant::load(&config)?;

    info!("Answering one-shot question");
    let reply = assistant.answer(question)?;
    println!("{reply}");

    Ok(())
}

/// Show the state of the configuration, the Ollama endpoint, and the artifacts
#[inline]
pub fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 CeylonTrip Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🤖 Ollama Status:");
    match OllamaClient::new(&config) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   💬 Chat Model: {}", config.ollama.chat_model);
                println!("   📋 Embedding Model: {}", config.ollama.embedding_model);
                println!("   🔢 Batch Size: {}", config.ollama.batch_size);
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Connected but unhealthy - {e}");
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Failed to connect - {e}");
        }
    }

    println!();
    println!("📁 Corpus Sources:");
    for (label, path) in [
        ("Destinations", config.destinations_path()),
        ("Routes", config.routes_path()),
        ("Tips", config.tips_path()),
    ] {
        if path.exists() {
            println!("   ✅ {}: {}", label, path.display());
        } else {
            println!("   ❌ {}: missing ({})", label, path.display());
        }
    }

    println!();
    println!("🔍 Index Artifacts:");
    if config.index_path().exists() && config.metadata_path().exists() {
        println!("   ✅ Index: {}", config.index_path().display());
        match index::load_metadata(&config.metadata_path()) {
            Ok(corpus) => {
                println!("   📄 Corpus chunks: {}", corpus.len());
                for kind in [SourceKind::Destinations, SourceKind::Routes, SourceKind::Tips] {
                    let count = corpus.iter().filter(|r| r.source == kind).count();
                    if count > 0 {
                        println!("      {count} from {kind}");
                    }
                }
            }
            Err(e) => println!("   ⚠️  Metadata: unreadable - {e}"),
        }
    } else {
        println!("   📭 No index built yet");
        println!("   Use 'ceylontrip build' to build one");
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'ceylontrip build' to (re)build the index from the corpus");
    println!("   • Use 'ceylontrip chat' to start an interactive session");
    println!("   • Use 'ceylontrip config' to update connection settings");

    Ok(())
}
