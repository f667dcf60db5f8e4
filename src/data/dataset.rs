use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One tokenised, padded sentence pair.
/// `source` is padded to max_len; `target` is [BOS] ids [EOS]
/// padded to max_len.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSample {
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

impl TranslationSample {
    /// Number of non-PAD target ids, BOS and EOS included.
    pub fn target_tokens(&self) -> usize {
        self.target
            .iter()
            .filter(|&&id| id != crate::domain::tokens::PAD_ID)
            .count()
    }
}

pub struct TranslationDataset {
    samples: Vec<TranslationSample>,
}

impl TranslationDataset {
    pub fn new(samples: Vec<TranslationSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<TranslationSample> for TranslationDataset {
    fn get(&self, index: usize) -> Option<TranslationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_indexing() {
        let sample = TranslationSample { source: vec![5, 0], target: vec![2, 6, 3, 0] };
        let ds     = TranslationDataset::new(vec![sample.clone()]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0), Some(sample));
        assert_eq!(ds.get(1), None);
        assert_eq!(ds.get(0).map(|s| s.target_tokens()), Some(3));
    }
}
