// ============================================================
// Layer 2 — TokenizeUseCase
// ============================================================
// Inspect how one language side tokenises a sentence:
// subword ids, the padded model input and the detokenised
// round trip. Builds the tokenizer from the training file when
// none is saved yet.

use anyhow::Result;

use crate::data::{
    loader::JsonCorpus,
    padding::{pad_sequence, strip_framing, wrap_target},
    preprocessor::Preprocessor,
};
use crate::domain::{
    sentence_pair::SentencePair,
    tokens::{is_special, LanguageSide},
    traits::PairSource,
};
use crate::infra::tokenizer_store::{TokenizerKey, TokenizerStore};

#[derive(Debug, Clone)]
pub struct TokenizeConfig {
    pub train_file:  String,
    pub pair:        String,
    pub reverse:     bool,
    pub output_dir:  String,
    pub side:        LanguageSide,
    pub vocab_size:  usize,
    pub max_seq_len: usize,
}

#[derive(Debug)]
pub struct TokenizeReport {
    pub ids:        Vec<u32>,
    pub padded:     Vec<u32>,
    pub round_trip: String,
    pub vocab_size: usize,
}

impl TokenizeReport {
    /// Count of PAD/UNK/BOS/EOS ids in the padded sequence.
    pub fn special_count(&self) -> usize {
        self.padded.iter().filter(|&&id| is_special(id)).count()
    }
}

pub struct TokenizeUseCase {
    config: TokenizeConfig,
}

impl TokenizeUseCase {
    pub fn new(config: TokenizeConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, sentence: &str) -> Result<TokenizeReport> {
        let cfg   = &self.config;
        let store = TokenizerStore::new(&cfg.output_dir);
        let prep  = Preprocessor::new();

        let key = TokenizerKey::new(cfg.side.language(&cfg.pair, cfg.reverse), cfg.vocab_size);
        let texts = if store.is_current(cfg.side, &key) {
            Vec::new()
        } else {
            self.side_texts(&prep)?
        };
        let tokenizer = store.load_or_build(cfg.side, &key, &texts)?;

        let ids = tokenizer.encode(&prep.clean(sentence))?;
        let framed = match cfg.side {
            LanguageSide::Source => ids.clone(),
            LanguageSide::Target => wrap_target(&ids),
        };
        let padded     = pad_sequence(&framed, cfg.max_seq_len);
        let round_trip = tokenizer.decode(&strip_framing(&padded))?;

        Ok(TokenizeReport { ids, padded, round_trip, vocab_size: tokenizer.vocab_size() })
    }

    fn side_texts(&self, prep: &Preprocessor) -> Result<Vec<String>> {
        let cfg   = &self.config;
        let pairs = JsonCorpus::new(&cfg.train_file, &cfg.pair).load_pairs()?;
        let pairs = pairs.into_iter().map(|p| if cfg.reverse { p.reversed() } else { p });
        Ok(pairs
            .map(|p: SentencePair| match cfg.side {
                LanguageSide::Source => prep.clean(&p.source),
                LanguageSide::Target => prep.clean(&p.target),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tokens::{BOS_ID, EOS_ID, PAD_ID};
    use std::fs;

    fn config(name: &str, side: LanguageSide) -> TokenizeConfig {
        let dir = std::env::temp_dir().join(format!("nmt_tokenize_{}_{}", name, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        let train = serde_json::json!({
            "English-Bengali": { "Train": {
                "0": { "source": "good morning", "target": "শুভ সকাল" }
            }}
        });
        let train_file = dir.join("train.json");
        fs::write(&train_file, train.to_string()).unwrap();

        TokenizeConfig {
            train_file:  train_file.to_string_lossy().to_string(),
            pair:        "English-Bengali".to_string(),
            reverse:     false,
            output_dir:  dir.to_string_lossy().to_string(),
            side,
            vocab_size:  300,
            max_seq_len: 20,
        }
    }

    #[test]
    fn test_target_side_is_framed_and_round_trips() {
        let report = TokenizeUseCase::new(config("target", LanguageSide::Target))
            .execute("শুভ সকাল")
            .unwrap();
        assert_eq!(report.padded.len(), 20);
        assert_eq!(report.padded[0], BOS_ID);
        assert_eq!(report.padded[report.ids.len() + 1], EOS_ID);
        assert_eq!(report.round_trip, "শুভ সকাল");
        assert_eq!(report.special_count(), 20 - report.ids.len());
    }

    #[test]
    fn test_source_side_is_only_padded() {
        let report = TokenizeUseCase::new(config("source", LanguageSide::Source))
            .execute("  good   morning ")
            .unwrap();
        assert_eq!(&report.padded[..report.ids.len()], report.ids.as_slice());
        assert!(report.padded[report.ids.len()..].iter().all(|&id| id == PAD_ID));
        assert_eq!(report.round_trip, "good morning");
    }
}
