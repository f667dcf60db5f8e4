// ============================================================
// Layer 4 — Translation Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks padded samples into
// two Int tensors of shape [batch_size, max_len].
//
//   [s1_t1, ..., s1_tL, s2_t1, ..., sN_tL] → reshape [N, L]
//
// All samples share one length (pre-padded), so no dynamic
// padding happens here. An empty item list yields tensors of
// shape [0, 0], which the training step treats as a no-op.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TranslationSample;

/// A batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Source ids — shape: [batch_size, src_len]
    pub source: Tensor<B, 2, Int>,

    /// Framed target ids — shape: [batch_size, tgt_len]
    /// Teacher forcing slices this into input / output.
    pub target: Tensor<B, 2, Int>,
}

impl<B: Backend> TranslationBatch<B> {
    pub fn len(&self) -> usize {
        self.source.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, rows: Vec<&[u32]>) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        let seq_len    = rows.first().map_or(0, |r| r.len());
        let flat: Vec<i32> = rows
            .iter()
            .flat_map(|r| r.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

impl<B: Backend> Batcher<TranslationSample, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<TranslationSample>) -> TranslationBatch<B> {
        let source = self.stack(items.iter().map(|s| s.source.as_slice()).collect());
        let target = self.stack(items.iter().map(|s| s.target.as_slice()).collect());
        TranslationBatch { source, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let batcher = TranslationBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![
            TranslationSample { source: vec![5, 6, 0], target: vec![2, 7, 3, 0] },
            TranslationSample { source: vec![8, 0, 0], target: vec![2, 9, 9, 3] },
        ]);

        assert_eq!(batch.source.dims(), [2, 3]);
        assert_eq!(batch.target.dims(), [2, 4]);
        let target: Vec<i64> = batch
            .target
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(target, vec![2, 7, 3, 0, 2, 9, 9, 3]);
    }

    #[test]
    fn test_empty_batch() {
        let batcher = TranslationBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(Vec::new());
        assert!(batch.is_empty());
    }
}
