// ============================================================
// Layer 5 — Transformer Block
// ============================================================
// One block, post-norm ("Norm(x + Sublayer(x))"):
//
//   a = MultiHeadAttention(query, key, value, mask)
//   x = LayerNorm(query + Dropout(a))
//   f = FeedForward(x)
//   y = LayerNorm(x + Dropout(f))
//
// Encoder and decoder use the same block; only the bindings
// differ. Encoder: query = key = value = source states.
// Decoder: query = target states, key = value = encoder output.

use anyhow::Result;
use burn::{
    nn::{Dropout, DropoutConfig, LayerNorm, LayerNormConfig},
    prelude::*,
};

use crate::ml::attention::{MultiHeadAttention, MultiHeadAttentionConfig};
use crate::ml::feed_forward::{FeedForward, FeedForwardConfig};

#[derive(Config, Debug)]
pub struct TransformerBlockConfig {
    pub embed_size:     usize,
    pub num_heads:      usize,
    pub ff_hidden_size: usize,
    #[config(default = 0.1)]
    pub dropout:        f64,
}

impl TransformerBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<TransformerBlock<B>> {
        Ok(TransformerBlock {
            attention:    MultiHeadAttentionConfig::new(self.embed_size, self.num_heads).init(device)?,
            norm1:        LayerNormConfig::new(self.embed_size).init(device),
            norm2:        LayerNormConfig::new(self.embed_size).init(device),
            feed_forward: FeedForwardConfig::new(self.embed_size, self.ff_hidden_size)
                .with_dropout(self.dropout)
                .init(device),
            dropout:      DropoutConfig::new(self.dropout).init(),
        })
    }
}

#[derive(Module, Debug)]
pub struct TransformerBlock<B: Backend> {
    attention:    MultiHeadAttention<B>,
    norm1:        LayerNorm<B>,
    norm2:        LayerNorm<B>,
    feed_forward: FeedForward<B>,
    dropout:      Dropout,
}

impl<B: Backend> TransformerBlock<B> {
    /// Output has the query's shape [batch, seq_q, embed].
    pub fn forward(
        &self,
        query: Tensor<B, 3>,
        key:   Tensor<B, 3>,
        value: Tensor<B, 3>,
        mask:  Option<Tensor<B, 3, Int>>,
    ) -> Tensor<B, 3> {
        let (attended, _weights) = self.attention.forward(query.clone(), key, value, mask);
        let x = self.norm1.forward(query + self.dropout.forward(attended));

        let fed = self.feed_forward.forward(x.clone());
        self.norm2.forward(x + self.dropout.forward(fed))
    }
}
