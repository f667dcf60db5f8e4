// ============================================================
// Layer 3 — Sentence Pair Domain Types
// ============================================================
// A training example is a source sentence with its reference
// translation. Validation records carry only the source side;
// the model's output is keyed back to the record id.

use serde::{Deserialize, Serialize};

/// One parallel training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Record id from the corpus file
    pub id: String,

    /// Sentence in the language we translate from
    pub source: String,

    /// Reference translation
    pub target: String,
}

impl SentencePair {
    pub fn new(
        id:     impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id:     id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Swap the translation direction (e.g. Bengali → English).
    pub fn reversed(self) -> Self {
        Self {
            id:     self.id,
            source: self.target,
            target: self.source,
        }
    }
}

/// A record to translate; the target side is withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id:     String,
    pub source: String,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self { id: id.into(), source: source.into() }
    }
}
