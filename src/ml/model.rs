// ============================================================
// Layer 5 — Transformer (encoder-decoder)
// ============================================================
//   src ids ─► src embedding ─► + positional ─► dropout
//           ─► encoder block × N   (query = key = value = source)
//           ─► memory
//
//   tgt ids ─► tgt embedding ─► + positional ─► dropout
//           ─► decoder block × N   (query = target,
//                                   key = value = memory)
//           ─► linear ─► logits [batch, tgt_len, tgt_vocab]
//
// Decoder blocks do not self-attend over the target before the
// cross-attention; each decoder block is the same
// TransformerBlock as the encoder with a different binding.
// Logits are raw: the caller applies softmax / cross-entropy.

use anyhow::{ensure, Result};
use burn::{
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
};

use crate::ml::attention::padding_mask;
use crate::ml::block::{TransformerBlock, TransformerBlockConfig};
use crate::ml::positional::{PositionalEncoding, PositionalEncodingConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct TransformerConfig {
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    #[config(default = 256)]
    pub embed_size:     usize,
    #[config(default = 8)]
    pub num_heads:      usize,
    #[config(default = 6)]
    pub num_layers:     usize,
    #[config(default = 2048)]
    pub ff_hidden_size: usize,
    #[config(default = 0.1)]
    pub dropout:        f64,
    /// Rows in the positional table; the longest sequence the model accepts.
    #[config(default = 1000)]
    pub max_positions:  usize,
}

impl TransformerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Transformer<B>> {
        ensure!(self.src_vocab_size > 0 && self.tgt_vocab_size > 0, "vocabulary sizes must be non-zero");
        ensure!(self.embed_size > 0, "embed_size must be non-zero");
        ensure!(self.max_positions > 0, "max_positions must be non-zero");

        let block = TransformerBlockConfig::new(self.embed_size, self.num_heads, self.ff_hidden_size)
            .with_dropout(self.dropout);
        let encoder = (0..self.num_layers)
            .map(|_| block.init(device))
            .collect::<Result<Vec<_>>>()?;
        let decoder = (0..self.num_layers)
            .map(|_| block.init(device))
            .collect::<Result<Vec<_>>>()?;

        Ok(Transformer {
            src_embedding: EmbeddingConfig::new(self.src_vocab_size, self.embed_size).init(device),
            tgt_embedding: EmbeddingConfig::new(self.tgt_vocab_size, self.embed_size).init(device),
            positional:    PositionalEncodingConfig::new(self.embed_size)
                .with_max_len(self.max_positions)
                .init(device),
            encoder,
            decoder,
            fc_out:        LinearConfig::new(self.embed_size, self.tgt_vocab_size).init(device),
            dropout:       DropoutConfig::new(self.dropout).init(),
        })
    }
}

#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    src_embedding: Embedding<B>,
    tgt_embedding: Embedding<B>,
    positional:    PositionalEncoding<B>,
    encoder:       Vec<TransformerBlock<B>>,
    decoder:       Vec<TransformerBlock<B>>,
    fc_out:        Linear<B>,
    dropout:       Dropout,
}

impl<B: Backend> Transformer<B> {
    /// Longest source or target sequence this model can embed.
    pub fn max_positions(&self) -> usize {
        self.positional.max_len()
    }

    /// src: [batch, src_len], tgt: [batch, tgt_len] → [batch, tgt_len, tgt_vocab]
    ///
    /// `src_mask` is `[batch, src_len, src_len]` for encoder
    /// self-attention; `cross_mask` is `[batch, tgt_len, src_len]`
    /// for decoder cross-attention. Zero entries are masked.
    pub fn forward(
        &self,
        src:        Tensor<B, 2, Int>,
        tgt:        Tensor<B, 2, Int>,
        src_mask:   Option<Tensor<B, 3, Int>>,
        cross_mask: Option<Tensor<B, 3, Int>>,
    ) -> Tensor<B, 3> {
        let memory = self.encode(src, src_mask);
        self.decode(tgt, memory, cross_mask)
    }

    /// Forward with PAD source keys masked in both stacks.
    pub fn forward_masked(&self, src: Tensor<B, 2, Int>, tgt: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let src_len = src.dims()[1];
        let tgt_len = tgt.dims()[1];
        let src_mask   = padding_mask(src.clone(), src_len);
        let cross_mask = padding_mask(src.clone(), tgt_len);
        self.forward(src, tgt, Some(src_mask), Some(cross_mask))
    }

    /// Run the encoder stack → memory [batch, src_len, embed].
    pub fn encode(&self, src: Tensor<B, 2, Int>, mask: Option<Tensor<B, 3, Int>>) -> Tensor<B, 3> {
        let mut x = self.embed(&self.src_embedding, src);
        for block in &self.encoder {
            x = block.forward(x.clone(), x.clone(), x, mask.clone());
        }
        x
    }

    /// Run the decoder stack over `memory` and project to logits.
    pub fn decode(
        &self,
        tgt:    Tensor<B, 2, Int>,
        memory: Tensor<B, 3>,
        mask:   Option<Tensor<B, 3, Int>>,
    ) -> Tensor<B, 3> {
        let mut y = self.embed(&self.tgt_embedding, tgt);
        for block in &self.decoder {
            y = block.forward(y, memory.clone(), memory.clone(), mask.clone());
        }
        self.fc_out.forward(y)
    }

    fn embed(&self, table: &Embedding<B>, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.dropout.forward(self.positional.forward(table.forward(ids)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray;

    fn tiny_config() -> TransformerConfig {
        TransformerConfig::new(12, 9)
            .with_embed_size(8)
            .with_num_heads(2)
            .with_num_layers(2)
            .with_ff_hidden_size(16)
            .with_dropout(0.0)
            .with_max_positions(20)
    }

    fn ids(values: Vec<i32>, shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
        Tensor::from_data(TensorData::new(values, shape), &Default::default())
    }

    #[test]
    fn test_logits_shape() {
        let model  = tiny_config().init::<TestBackend>(&Default::default()).unwrap();
        let src    = ids(vec![4, 5, 6, 0, 7, 8, 0, 0], [2, 4]);
        let tgt    = ids(vec![2, 4, 5, 2, 6, 0], [2, 3]);
        let logits = model.forward_masked(src, tgt);
        assert_eq!(logits.dims(), [2, 3, 9]);
        assert_eq!(model.max_positions(), 20);
    }

    #[test]
    fn test_source_padding_is_invisible_with_mask() {
        // Extra PAD on the source must not change the logits when masked.
        let model = tiny_config().init::<TestBackend>(&Default::default()).unwrap();
        let tgt   = ids(vec![2, 4], [1, 2]);

        let short: Vec<f32> = model
            .forward_masked(ids(vec![4, 5, 0], [1, 3]), tgt.clone())
            .into_data()
            .to_vec()
            .unwrap();
        let long: Vec<f32> = model
            .forward_masked(ids(vec![4, 5, 0, 0, 0], [1, 5]), tgt)
            .into_data()
            .to_vec()
            .unwrap();

        for (a, b) in short.iter().zip(long.iter()) {
            assert!((a - b).abs() < 1e-4, "{a} vs {b}");
        }
    }

    #[test]
    fn test_invalid_head_count_fails_construction() {
        let cfg = tiny_config().with_num_heads(3);
        assert!(cfg.init::<TestBackend>(&Default::default()).is_err());
    }
}
