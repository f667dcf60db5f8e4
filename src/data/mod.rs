// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From a corpus JSON file to tensor batches:
//
//   corpus .json
//       │
//       ▼
//   JsonCorpus        → reads <pair>.Train / Test mappings
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, invisibles)
//       │
//       ▼
//   SubwordTokenizer  → text to BPE ids (infra layer)
//       │
//       ▼
//   padding           → BOS/EOS framing, pad/truncate to max_len
//       │
//       ▼
//   TranslationDataset → implements Burn's Dataset trait
//       │
//       ▼
//   TranslationBatcher → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → shuffled batches for the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads parallel and source-only records from corpus JSON
pub mod loader;

/// Cleans and normalises raw text
pub mod preprocessor;

/// Fixed-length id sequences
pub mod padding;

/// Implements Burn's Dataset trait for sentence pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
