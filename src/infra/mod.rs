// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the output directory:
//
//   tokenizer_store.rs — trains a byte-level BPE tokenizer per
//                        language side, or loads a saved one
//
//   metrics.rs         — per-epoch loss written to metrics.csv
//
//   export.rs          — translated records as JSON, CSV and
//                        JSON-lines (plus ASCII-escaped copies)
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Tokenizer training, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;

/// Translation file writers
pub mod export;
