// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   attention.rs    — scaled dot-product attention, padding
//                     masks, multi-head attention
//   feed_forward.rs — position-wise two-layer network (ReLU)
//   positional.rs   — fixed sinusoidal position table
//   block.rs        — attention + feed-forward with post-norm
//                     residuals; shared by encoder and decoder
//   model.rs        — embeddings, encoder/decoder stacks and
//                     the vocabulary projection
//   decoder.rs      — greedy autoregressive decoding
//   trainer.rs      — teacher-forced training loop (Adam,
//                     PAD-ignoring cross-entropy)
//   translator.rs   — text in, text out
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

pub mod attention;

pub mod feed_forward;

pub mod positional;

/// Encoder/decoder building block
pub mod block;

/// Full encoder-decoder Transformer
pub mod model;

pub mod decoder;

/// Training loop over the shuffled DataLoader
pub mod trainer;

pub mod translator;
