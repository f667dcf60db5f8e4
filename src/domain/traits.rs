// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to corpora and translators only
// through these traits.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::sentence_pair::{SentencePair, SourceRecord};

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Anything that yields parallel training pairs.
///
/// Implementations:
///   - JsonCorpus → the `<pair>.Train` mapping of a corpus JSON file
pub trait PairSource {
    fn load_pairs(&self) -> Result<Vec<SentencePair>>;
}

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that yields source-only records to translate.
///
/// Implementations:
///   - JsonCorpus → the `Test` mapping of a validation JSON file
pub trait RecordSource {
    fn load_records(&self) -> Result<Vec<SourceRecord>>;
}

// ─── Translate ────────────────────────────────────────────────────────────────
/// Turns a source sentence into a target sentence.
///
/// Implementations:
///   - Translator → Transformer + greedy decoding
pub trait Translate {
    fn translate(&self, text: &str) -> Result<String>;

    /// Translate every record, keyed by record id.
    fn translate_records(&self, records: &[SourceRecord]) -> Result<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            let translated = self.translate(&record.source)?;
            out.insert(record.id.clone(), translated);
            if (i + 1) % 100 == 0 {
                tracing::info!("Translated {}/{} records", i + 1, records.len());
            }
        }
        Ok(out)
    }
}
