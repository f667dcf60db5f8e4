// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
// sentence pairs, the reserved token ids, and the traits the
// data and ml layers implement.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain structs, enums, constants and traits

/// Reserved token ids and the language-side selector
pub mod tokens;

/// A parallel sentence pair and an untranslated source record
pub mod sentence_pair;

/// Core abstractions (traits) that other layers implement
pub mod traits;
