// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestration only: each use case wires the data, ml and
// infra layers together for one command.
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No printing here (that's Layer 1)
//   - Backend selection happens here and nowhere else
//
// Reference: Clean Architecture pattern

// Tokenizers → training → translation → export
pub mod train_use_case;

// Tokenizer inspection for one sentence
pub mod tokenize_use_case;
