// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the competition-style JSON corpora.
//
// Training file:
//   {
//     "English-Bengali": {
//       "Train": {
//         "0": { "source": "hello", "target": "হ্যালো" },
//         ...
//       }
//     }
//   }
//
// Validation file: same layout with a "Test" split whose
// records carry only "source". A top-level "Test" mapping
// (no language-pair wrapper) is accepted as well.
//
// Records come back ordered by id (BTreeMap) so every run
// sees the same corpus order before shuffling.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::domain::sentence_pair::{SentencePair, SourceRecord};
use crate::domain::traits::{PairSource, RecordSource};

#[derive(Debug, Deserialize)]
struct TrainEntry {
    source: String,
    target: String,
}

#[derive(Debug, Deserialize)]
struct TestEntry {
    source: String,
}

/// A corpus JSON file scoped to one language pair.
pub struct JsonCorpus {
    path: PathBuf,
    pair: String,
}

impl JsonCorpus {
    pub fn new(path: impl Into<PathBuf>, pair: impl Into<String>) -> Self {
        Self { path: path.into(), pair: pair.into() }
    }

    fn read(&self) -> Result<Value> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Malformed JSON in '{}'", self.path.display()))
    }
}

impl PairSource for JsonCorpus {
    fn load_pairs(&self) -> Result<Vec<SentencePair>> {
        let root  = self.read()?;
        let split = root
            .get(&self.pair)
            .with_context(|| {
                format!("Key '{}' not found in '{}'", self.pair, self.path.display())
            })?
            .get("Train")
            .with_context(|| {
                format!("Key '{}.Train' not found in '{}'", self.pair, self.path.display())
            })?;

        let entries: BTreeMap<String, TrainEntry> = serde_json::from_value(split.clone())
            .with_context(|| {
                format!(
                    "'{}.Train' in '{}' must map ids to {{source, target}}",
                    self.pair,
                    self.path.display()
                )
            })?;

        let pairs: Vec<SentencePair> = entries
            .into_iter()
            .map(|(id, e)| SentencePair::new(id, e.source, e.target))
            .collect();

        tracing::info!("Loaded {} training pairs from '{}'", pairs.len(), self.path.display());
        Ok(pairs)
    }
}

impl RecordSource for JsonCorpus {
    fn load_records(&self) -> Result<Vec<SourceRecord>> {
        let root  = self.read()?;
        let split = root
            .get(&self.pair)
            .and_then(|p| p.get("Test"))
            .or_else(|| root.get("Test"))
            .with_context(|| {
                format!(
                    "Neither '{}.Test' nor 'Test' found in '{}'",
                    self.pair,
                    self.path.display()
                )
            })?;

        let entries: BTreeMap<String, TestEntry> = serde_json::from_value(split.clone())
            .with_context(|| {
                format!("'Test' in '{}' must map ids to {{source}}", self.path.display())
            })?;

        let records: Vec<SourceRecord> = entries
            .into_iter()
            .map(|(id, e)| SourceRecord::new(id, e.source))
            .collect();

        tracing::info!("Loaded {} records to translate from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}
