// ============================================================
// Layer 5 — Greedy Decoder
// ============================================================
// Autoregressive inference for one source sentence:
//
//   generated = [BOS]
//   loop:
//     logits = model(source, generated)        (full re-run)
//     next   = argmax(logits[last position])
//     generated.push(next)
//     stop if next == EOS or len == max_len
//
// Each step re-processes the whole prefix; there is no cached
// incremental state.

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::domain::tokens::{BOS_ID, EOS_ID};
use crate::ml::model::Transformer;

/// Anything that maps (source, target prefix) to next-token logits.
pub trait Seq2SeqModel<B: Backend> {
    /// source: [1, src_len], prefix: [1, len] → logits [1, len, vocab]
    fn logits(&self, source: Tensor<B, 2, Int>, prefix: Tensor<B, 2, Int>) -> Tensor<B, 3>;

    /// Longest prefix the model can embed.
    fn max_positions(&self) -> usize;
}

impl<B: Backend> Seq2SeqModel<B> for Transformer<B> {
    fn logits(&self, source: Tensor<B, 2, Int>, prefix: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.forward_masked(source, prefix)
    }

    fn max_positions(&self) -> usize {
        Transformer::max_positions(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyDecoder {
    /// Upper bound on the generated sequence, BOS included.
    pub max_len: usize,
    pub bos_id:  u32,
    pub eos_id:  u32,
}

impl Default for GreedyDecoder {
    fn default() -> Self {
        Self { max_len: 50, bos_id: BOS_ID, eos_id: EOS_ID }
    }
}

impl GreedyDecoder {
    pub fn new(max_len: usize) -> Self {
        Self { max_len, ..Self::default() }
    }

    /// Returns the generated ids, starting with BOS and ending with
    /// EOS unless `max_len` was reached first.
    pub fn decode<B: Backend, M: Seq2SeqModel<B>>(
        &self,
        model:  &M,
        source: Tensor<B, 2, Int>,
    ) -> Result<Vec<u32>> {
        ensure!(self.max_len >= 1, "decode max_len must be at least 1");
        ensure!(
            self.max_len <= model.max_positions(),
            "decode max_len ({}) exceeds the positional table ({})",
            self.max_len,
            model.max_positions()
        );

        let device = source.device();
        let mut generated = vec![self.bos_id];

        while generated.len() < self.max_len {
            let prefix_len = generated.len();
            let prefix: Vec<i32> = generated.iter().map(|&id| id as i32).collect();
            let prefix = Tensor::<B, 1, Int>::from_ints(prefix.as_slice(), &device)
                .reshape([1, prefix_len]);

            let logits = model.logits(source.clone(), prefix);
            let [_, steps, vocab] = logits.dims();
            let next = logits
                .slice([0..1, steps - 1..steps, 0..vocab])
                .argmax(2)
                .into_scalar()
                .elem::<i64>() as u32;

            generated.push(next);
            if next == self.eos_id {
                break;
            }
        }

        tracing::debug!("Greedy decode produced {} ids", generated.len());
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::TransformerConfig;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray;

    /// Puts all probability mass on a fixed token at every position.
    struct AlwaysPredicts {
        token: u32,
        vocab: usize,
    }

    impl Seq2SeqModel<TestBackend> for AlwaysPredicts {
        fn logits(
            &self,
            _source: Tensor<TestBackend, 2, Int>,
            prefix:  Tensor<TestBackend, 2, Int>,
        ) -> Tensor<TestBackend, 3> {
            let steps = prefix.dims()[1];
            let mut values = vec![-10.0f32; steps * self.vocab];
            for step in 0..steps {
                values[step * self.vocab + self.token as usize] = 10.0;
            }
            Tensor::from_data(TensorData::new(values, [1, steps, self.vocab]), &prefix.device())
        }

        fn max_positions(&self) -> usize {
            1000
        }
    }

    fn source() -> Tensor<TestBackend, 2, Int> {
        Tensor::from_data(TensorData::new(vec![5i32, 6, 0], [1, 3]), &Default::default())
    }

    #[test]
    fn test_stops_right_after_bos_when_eos_predicted() {
        let model = AlwaysPredicts { token: EOS_ID, vocab: 4 };
        let ids   = GreedyDecoder::default().decode(&model, source()).unwrap();
        assert_eq!(ids, vec![BOS_ID, EOS_ID]);
    }

    #[test]
    fn test_max_len_bounds_generation() {
        let model = AlwaysPredicts { token: 7, vocab: 10 };
        let ids   = GreedyDecoder::new(5).decode(&model, source()).unwrap();
        assert_eq!(ids, vec![BOS_ID, 7, 7, 7, 7]);
    }

    #[test]
    fn test_max_len_beyond_positional_table_is_rejected() {
        let model = AlwaysPredicts { token: EOS_ID, vocab: 4 };
        assert!(GreedyDecoder::new(1001).decode(&model, source()).is_err());
    }

    #[test]
    fn test_decodes_with_real_transformer() {
        let model = TransformerConfig::new(10, 10)
            .with_embed_size(8)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_ff_hidden_size(16)
            .with_max_positions(16)
            .init::<TestBackend>(&Default::default())
            .unwrap();

        let ids = GreedyDecoder::new(6).decode(&model, source()).unwrap();
        assert_eq!(ids[0], BOS_ID);
        assert!(ids.len() <= 6);
        assert!(ids.iter().all(|&id| id < 10));
    }
}
