// ============================================================
// Layer 5 — Translator
// ============================================================
// Sentence in, sentence out:
//
//   clean → encode (source BPE) → pad to max_seq_len
//         → greedy decode → strip BOS/EOS/PAD
//         → decode (target BPE)
//
// Runs on a plain (non-autodiff) backend; the training use case
// hands over `model.valid()` after the last epoch.

use anyhow::{ensure, Result};
use burn::prelude::*;
use burn::tensor::TensorData;

use crate::data::padding::{pad_sequence, strip_framing};
use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::Translate;
use crate::infra::tokenizer_store::SubwordTokenizer;
use crate::ml::decoder::GreedyDecoder;
use crate::ml::model::Transformer;

pub struct Translator<B: Backend> {
    model:        Transformer<B>,
    source:       SubwordTokenizer,
    target:       SubwordTokenizer,
    decoder:      GreedyDecoder,
    preprocessor: Preprocessor,
    max_seq_len:  usize,
    device:       B::Device,
}

impl<B: Backend> Translator<B> {
    pub fn new(
        model:       Transformer<B>,
        source:      SubwordTokenizer,
        target:      SubwordTokenizer,
        decoder:     GreedyDecoder,
        max_seq_len: usize,
        device:      B::Device,
    ) -> Result<Self> {
        ensure!(max_seq_len >= 1, "max_seq_len must be at least 1");
        ensure!(
            max_seq_len <= model.max_positions(),
            "max_seq_len ({}) exceeds the positional table ({})",
            max_seq_len,
            model.max_positions()
        );
        Ok(Self {
            model,
            source,
            target,
            decoder,
            preprocessor: Preprocessor::new(),
            max_seq_len,
            device,
        })
    }

    /// Source text → padded `[1, max_seq_len]` id tensor.
    fn source_tensor(&self, text: &str) -> Result<Tensor<B, 2, Int>> {
        let ids    = self.source.encode(&self.preprocessor.clean(text))?;
        let padded = pad_sequence(&ids, self.max_seq_len);
        let values: Vec<i32> = padded.iter().map(|&id| id as i32).collect();
        Ok(Tensor::from_data(
            TensorData::new(values, [1, self.max_seq_len]),
            &self.device,
        ))
    }
}

impl<B: Backend> Translate for Translator<B> {
    fn translate(&self, text: &str) -> Result<String> {
        let source    = self.source_tensor(text)?;
        let generated = self.decoder.decode(&self.model, source)?;
        self.target.decode(&strip_framing(&generated))
    }
}
