
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::CeylonError;
use crate::config::Config;

/// Label of the pre-heading section of the tips document
const GENERAL_TIPS_TITLE: &str = "General travel tips";

/// Origin of a corpus record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Destinations,
    Routes,
    Tips,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destinations => write!(f, "destinations"),
            Self::Routes => write!(f, "routes"),
            Self::Tips => write!(f, "tips"),
        }
    }
}

/// One retrievable chunk of reference text. Immutable once built; the ordered
/// sequence of records determines index-position alignment with embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub id: String,
    pub source: SourceKind,
    pub text: String,
}

/// Locations of the three optional source files
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    pub destinations: PathBuf,
    pub routes: PathBuf,
    pub tips: PathBuf,
}

impl CorpusPaths {
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        Self {
            destinations: config.destinations_path(),
            routes: config.routes_path(),
            tips: config.tips_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DestinationRow {
    name: String,
    region: String,
    types: String,
    best_months: String,
    recommended_days: String,
    highlights: String,
    vibe: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    #[serde(rename = "from")]
    origin: String,
    #[serde(rename = "to")]
    destination: String,
    transport: String,
    hours_min: String,
    hours_max: String,
    scenic: String,
    notes: String,
}

/// Derive a stable id fragment: lowercase, collapse runs of non-alphanumeric
/// characters to a single underscore, trim leading/trailing underscores.
/// Used only for id stability, not uniqueness-checked.
#[inline]
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            out.push(c);
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Load destination records, one per CSV row
#[inline]
pub fn load_destinations(path: &Path) -> Result<Vec<CorpusRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open destinations file: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: DestinationRow = row.context("Failed to parse destinations row")?;
        let text = format!(
            "[DESTINATION] {}\n\
             Region: {}\n\
             Types: {}\n\
             Best months: {}\n\
             Recommended days: {}\n\
             Highlights: {}\n\
             Vibe: {}\n\
             Details: {}",
            row.name,
            row.region,
            row.types,
            row.best_months,
            row.recommended_days,
            row.highlights,
            row.vibe,
            row.description,
        );
        records.push(CorpusRecord {
            id: format!("dest_{}", slug(&row.name)),
            source: SourceKind::Destinations,
            text,
        });
    }

    debug!("Loaded {} destination records", records.len());
    Ok(records)
}

/// Load route records, one per CSV row
#[inline]
pub fn load_routes(path: &Path) -> Result<Vec<CorpusRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open routes file: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: RouteRow = row.context("Failed to parse routes row")?;
        let text = format!(
            "[ROUTE] {} → {}\n\
             Transport: {}\n\
             Approx time: {}–{} hours\n\
             Scenic: {}\n\
             Notes: {}",
            row.origin,
            row.destination,
            row.transport,
            row.hours_min,
            row.hours_max,
            row.scenic,
            row.notes,
        );
        records.push(CorpusRecord {
            id: format!("route_{}_{}", slug(&row.origin), slug(&row.destination)),
            source: SourceKind::Routes,
            text,
        });
    }

    debug!("Loaded {} route records", records.len());
    Ok(records)
}

/// Load tip records by splitting the document on second-level headings.
/// Section ids keep their split position even when empty sections are skipped.
#[inline]
pub fn load_tips(path: &Path) -> Result<Vec<CorpusRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tips file: {}", path.display()))?;

    let mut records = Vec::new();
    for (i, section) in content.split("\n## ").enumerate() {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }

        let (title, text) = if i == 0 {
            (GENERAL_TIPS_TITLE.to_string(), section.to_string())
        } else {
            let (title_line, body) = section.split_once('\n').unwrap_or((section, ""));
            let title = title_line.trim_matches(['#', ' ']).to_string();
            let text = format!("## {title}\n{body}");
            (title, text)
        };

        records.push(CorpusRecord {
            id: format!("tips_{i:02}"),
            source: SourceKind::Tips,
            text: format!("[TIPS] {title}\n{text}"),
        });
    }

    debug!("Loaded {} tips records", records.len());
    Ok(records)
}

/// Build the full ordered corpus from whichever source files exist.
/// Order is destinations, then routes, then tips; this order fixes the
/// positional alignment between metadata and index rows.
#[inline]
pub fn build_corpus(paths: &CorpusPaths) -> Result<Vec<CorpusRecord>> {
    let mut corpus = Vec::new();

    if paths.destinations.exists() {
        corpus.extend(load_destinations(&paths.destinations)?);
    }
    if paths.routes.exists() {
        corpus.extend(load_routes(&paths.routes)?);
    }
    if paths.tips.exists() {
        corpus.extend(load_tips(&paths.tips)?);
    }

    if corpus.is_empty() {
        return Err(CeylonError::Corpus(format!(
            "No data found. Make sure destinations.csv, routes.csv, or tips.md exist in {}",
            paths
                .destinations
                .parent()
                .unwrap_or(Path::new("."))
                .display()
        ))
        .into());
    }

    info!("Built corpus with {} records", corpus.len());
    Ok(corpus)
}
