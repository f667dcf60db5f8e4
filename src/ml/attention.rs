// ============================================================
// Layer 5 — Attention
// ============================================================
// Scaled dot-product attention and the multi-head wrapper.
//
//   scores  = Q · Kᵀ / √d_k
//   scores  = -1e9 where mask == 0
//   weights = softmax(scores, key axis)
//   context = weights · V
//
// Multi-head attention projects Q, K, V with independent
// linear maps, splits the embedding into `num_heads` slices of
// `head_dim = embed_size / num_heads`, attends per head, then
// concatenates the heads and applies an output projection.
//
// Reference: Vaswani et al. (2017) Attention Is All You Need §3.2

use anyhow::{ensure, Result};
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

use crate::domain::tokens::PAD_ID;

/// Score written into masked positions; softmax maps it to ≈0.
const MASKED_SCORE: f32 = -1.0e9;

/// Output of one attention call.
#[derive(Debug, Clone)]
pub struct AttentionOutput<B: Backend, const D: usize> {
    /// Weighted sum of values — shape (..., seq_q, d_v)
    pub context: Tensor<B, D>,

    /// Attention probabilities — shape (..., seq_q, seq_k)
    pub weights: Tensor<B, D>,
}

/// Scaled dot-product attention over the last two axes.
///
/// `mask` must already have the score shape (..., seq_q, seq_k);
/// entries equal to 0 are suppressed.
pub fn scaled_dot_product_attention<B: Backend, const D: usize>(
    query: Tensor<B, D>,
    key:   Tensor<B, D>,
    value: Tensor<B, D>,
    mask:  Option<Tensor<B, D, Int>>,
) -> AttentionOutput<B, D> {
    let d_k    = query.dims()[D - 1];
    let scores = query.matmul(key.transpose()) / (d_k as f64).sqrt();

    let scores = match mask {
        Some(mask) => scores.mask_fill(mask.equal_elem(0), MASKED_SCORE),
        None       => scores,
    };

    let weights = softmax(scores, D - 1);
    let context = weights.clone().matmul(value);
    AttentionOutput { context, weights }
}

/// Key-padding mask: 1 where `tokens` is not PAD, broadcast to
/// `[batch, query_len, key_len]`.
pub fn padding_mask<B: Backend>(tokens: Tensor<B, 2, Int>, query_len: usize) -> Tensor<B, 3, Int> {
    let [batch_size, key_len] = tokens.dims();
    tokens
        .not_equal_elem(PAD_ID as i32)
        .int()
        .unsqueeze_dim::<3>(1)
        .expand(Shape::new([batch_size, query_len, key_len]))
}

// ─── Multi-Head Attention ─────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct MultiHeadAttentionConfig {
    pub embed_size: usize,
    pub num_heads:  usize,
}

impl MultiHeadAttentionConfig {
    /// Fails when `embed_size` is not divisible by `num_heads`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<MultiHeadAttention<B>> {
        ensure!(self.num_heads > 0, "num_heads must be at least 1");
        ensure!(
            self.embed_size % self.num_heads == 0,
            "embed_size ({}) must be divisible by num_heads ({})",
            self.embed_size,
            self.num_heads
        );

        let linear = || LinearConfig::new(self.embed_size, self.embed_size).init(device);
        Ok(MultiHeadAttention {
            query:     linear(),
            key:       linear(),
            value:     linear(),
            output:    linear(),
            num_heads: self.num_heads,
            head_dim:  self.embed_size / self.num_heads,
        })
    }
}

#[derive(Module, Debug)]
pub struct MultiHeadAttention<B: Backend> {
    query:     Linear<B>,
    key:       Linear<B>,
    value:     Linear<B>,
    output:    Linear<B>,
    num_heads: usize,
    head_dim:  usize,
}

impl<B: Backend> MultiHeadAttention<B> {
    /// Returns the context `[batch, seq_q, embed]` and the per-head
    /// weights `[batch, heads, seq_q, seq_k]`.
    ///
    /// `mask`, when given, is `[batch or 1, seq_q, seq_k]` and is
    /// shared by every head.
    pub fn forward(
        &self,
        query: Tensor<B, 3>,
        key:   Tensor<B, 3>,
        value: Tensor<B, 3>,
        mask:  Option<Tensor<B, 3, Int>>,
    ) -> (Tensor<B, 3>, Tensor<B, 4>) {
        let [batch_size, seq_q, _] = query.dims();
        let seq_k = key.dims()[1];

        let q = self.split_heads(self.query.forward(query));
        let k = self.split_heads(self.key.forward(key));
        let v = self.split_heads(self.value.forward(value));

        let mask = mask.map(|m| {
            m.unsqueeze_dim::<4>(1)
                .expand(Shape::new([batch_size, self.num_heads, seq_q, seq_k]))
        });

        let attended = scaled_dot_product_attention(q, k, v, mask);
        let context  = self.output.forward(self.merge_heads(attended.context));

        (context, attended.weights)
    }

    /// [batch, seq, embed] → [batch, heads, seq, head_dim]
    fn split_heads(&self, x: Tensor<B, 3>) -> Tensor<B, 4> {
        let [batch_size, seq_len, _] = x.dims();
        x.reshape([batch_size, seq_len, self.num_heads, self.head_dim])
            .swap_dims(1, 2)
    }

    /// [batch, heads, seq, head_dim] → [batch, seq, embed]
    fn merge_heads(&self, x: Tensor<B, 4>) -> Tensor<B, 3> {
        let [batch_size, _, seq_len, _] = x.dims();
        x.swap_dims(1, 2)
            .reshape([batch_size, seq_len, self.num_heads * self.head_dim])
    }
}
