// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// One byte-level BPE tokenizer per language side, trained with
// the `tokenizers` crate and saved as
//
//   <dir>/tokenizer_source.json   + tokenizer_source.meta.json
//   <dir>/tokenizer_target.json   + tokenizer_target.meta.json
//
// The meta file records the language and vocab size the
// tokenizer was trained for. An existing tokenizer is reused
// only when both match; otherwise it is retrained. The BPE
// trainer registers the special tokens first, so they land on
// ids 0..=3 (PAD, UNK, BOS, EOS); this is checked on every load.
//
// Byte-level pre-tokenisation plus the byte-level decoder makes
// encode → decode lossless for any UTF-8 sentence, Bengali
// included.
//
// Reference: Sennrich et al. (2016) BPE paper

use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tokenizers::{
    models::{
        bpe::{BpeTrainerBuilder, BPE},
        TrainerWrapper,
    },
    pre_tokenizers::byte_level::ByteLevel,
    AddedToken, Tokenizer,
};

use crate::domain::tokens::{LanguageSide, SPECIAL_TOKENS, UNK_TOKEN};

/// A trained subword tokenizer for one language side.
pub struct SubwordTokenizer {
    inner: Tokenizer,
}

impl SubwordTokenizer {
    fn new(inner: Tokenizer) -> Result<Self> {
        for (expected, token) in SPECIAL_TOKENS.iter().enumerate() {
            let id = inner.token_to_id(token);
            ensure!(
                id == Some(expected as u32),
                "Special token {} has id {:?}, expected {}",
                token,
                id,
                expected
            );
        }
        Ok(Self { inner })
    }

    /// Text → subword ids, no special tokens added.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    /// Subword ids → text, special tokens skipped.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| anyhow!("Decode error: {e}"))
    }

    /// Vocabulary size including the special tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

/// What a saved tokenizer was trained for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerKey {
    pub language:   String,
    pub vocab_size: usize,
}

impl TokenizerKey {
    pub fn new(language: impl Into<String>, vocab_size: usize) -> Self {
        Self { language: language.into(), vocab_size }
    }
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn path(&self, side: LanguageSide) -> PathBuf {
        self.dir.join(format!("tokenizer_{}.json", side.as_str()))
    }

    fn meta_path(&self, side: LanguageSide) -> PathBuf {
        self.dir.join(format!("tokenizer_{}.meta.json", side.as_str()))
    }

    /// True when a saved tokenizer for `side` was trained for `key`.
    pub fn is_current(&self, side: LanguageSide, key: &TokenizerKey) -> bool {
        self.path(side).exists() && self.saved_key(side).as_ref() == Some(key)
    }

    fn saved_key(&self, side: LanguageSide) -> Option<TokenizerKey> {
        let text = fs::read_to_string(self.meta_path(side)).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Load the saved tokenizer for `side` if it matches `key`,
    /// otherwise train one on `texts`.
    pub fn load_or_build(
        &self,
        side:  LanguageSide,
        key:   &TokenizerKey,
        texts: &[String],
    ) -> Result<SubwordTokenizer> {
        if self.is_current(side, key) {
            tracing::info!("Loading existing {} tokenizer ({}) from disk", side.as_str(), key.language);
            return self.load(side);
        }

        if self.path(side).exists() {
            tracing::warn!(
                "Saved {} tokenizer does not match language={} vocab_size={}, retraining",
                side.as_str(),
                key.language,
                key.vocab_size
            );
        }
        tracing::info!(
            "Training {} BPE tokenizer on {} {} sentences (vocab_size={})",
            side.as_str(),
            texts.len(),
            key.language,
            key.vocab_size
        );
        let tokenizer = self.build_and_save(side, texts, key.vocab_size)?;

        let meta = self.meta_path(side);
        fs::write(&meta, serde_json::to_string_pretty(key)?)
            .with_context(|| format!("Cannot write '{}'", meta.display()))?;
        Ok(tokenizer)
    }

    pub fn load(&self, side: LanguageSide) -> Result<SubwordTokenizer> {
        let path = self.path(side);
        let tok  = Tokenizer::from_file(&path)
            .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))?;
        SubwordTokenizer::new(tok)
    }

    fn build_and_save(
        &self,
        side:       LanguageSide,
        texts:      &[String],
        vocab_size: usize,
    ) -> Result<SubwordTokenizer> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let special_tokens: Vec<AddedToken> = SPECIAL_TOKENS
            .iter()
            .map(|t| AddedToken::from(t.to_string(), true))
            .collect();
        let trainer = BpeTrainerBuilder::new()
            .vocab_size(vocab_size)
            .min_frequency(0)
            .show_progress(false)
            .special_tokens(special_tokens)
            .initial_alphabet(ByteLevel::alphabet())
            .build();
        let mut trainer = TrainerWrapper::BpeTrainer(trainer);

        let model = BPE::builder()
            .unk_token(UNK_TOKEN.to_string())
            .build()
            .map_err(|e| anyhow!("Cannot build BPE model: {e}"))?;

        let mut tokenizer = Tokenizer::new(model);
        tokenizer.with_pre_tokenizer(ByteLevel::new(false, true, true));
        tokenizer.with_decoder(ByteLevel::default());
        tokenizer
            .train(&mut trainer, texts.iter())
            .map_err(|e| anyhow!("BPE training failed: {e}"))?;

        let path = self.path(side);
        tokenizer
            .save(&path, true)
            .map_err(|e| anyhow!("Cannot write tokenizer to '{}': {}", path.display(), e))?;

        tracing::info!(
            "{} tokenizer trained with {} tokens, saved to '{}'",
            side.as_str(),
            tokenizer.get_vocab_size(true),
            path.display()
        );
        SubwordTokenizer::new(tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::padding::{pad_sequence, strip_framing, wrap_target};
    use crate::domain::tokens::{BOS_ID, EOS_ID, PAD_ID};

    fn temp_store(name: &str) -> (TokenizerStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("nmt_tok_{}_{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        (TokenizerStore::new(dir.to_string_lossy().to_string()), dir)
    }

    fn corpus() -> Vec<String> {
        vec![
            "hello world".to_string(),
            "the cat sat on the mat".to_string(),
            "আমি তোমাকে ভালোবাসি".to_string(),
            "শুভ সকাল".to_string(),
        ]
    }

    fn key() -> TokenizerKey {
        TokenizerKey::new("mixed", 400)
    }

    #[test]
    fn test_special_tokens_have_reserved_ids() {
        let (store, dir) = temp_store("special");
        let tok = store.load_or_build(LanguageSide::Source, &key(), &corpus()).unwrap();
        assert!(tok.vocab_size() > SPECIAL_TOKENS.len());
        assert!(store.path(LanguageSide::Source).exists());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_round_trip_through_padding() {
        let (store, dir) = temp_store("roundtrip");
        let tok = store.load_or_build(LanguageSide::Target, &key(), &corpus()).unwrap();

        for sentence in ["the cat sat on the mat", "শুভ সকাল", "unseen words decode too"] {
            let ids    = tok.encode(sentence).unwrap();
            assert!(ids.len() <= 48);
            let padded = pad_sequence(&wrap_target(&ids), 50);
            assert_eq!(padded.len(), 50);
            assert_eq!(padded[0], BOS_ID);
            assert!(padded.contains(&EOS_ID) && padded.contains(&PAD_ID));

            let recovered = tok.decode(&strip_framing(&padded)).unwrap();
            assert_eq!(recovered, sentence);
        }
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_saved_tokenizer_is_reloaded() {
        let (store, dir) = temp_store("reload");
        let built  = store.load_or_build(LanguageSide::Source, &key(), &corpus()).unwrap();
        // Empty corpus: must come from disk, not retrain.
        let loaded = store.load_or_build(LanguageSide::Source, &key(), &[]).unwrap();
        assert_eq!(built.vocab_size(), loaded.vocab_size());
        assert_eq!(built.encode("hello").unwrap(), loaded.encode("hello").unwrap());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_mismatched_key_retrains() {
        let (store, dir) = temp_store("mismatch");
        let english = vec!["good morning".to_string(), "good night".to_string()];
        let bengali = vec!["শুভ সকাল".to_string(), "শুভ রাত্রি".to_string()];

        let first = store
            .load_or_build(LanguageSide::Source, &TokenizerKey::new("English", 300), &english)
            .unwrap();
        let bytes_only = first.encode("শুভ সকাল").unwrap().len();
        let bengali_key = TokenizerKey::new("Bengali", 290);
        assert!(!store.is_current(LanguageSide::Source, &bengali_key));

        let rebuilt = store.load_or_build(LanguageSide::Source, &bengali_key, &bengali).unwrap();
        assert!(store.is_current(LanguageSide::Source, &bengali_key));
        assert!(rebuilt.vocab_size() <= 290);
        // Trained on Bengali now, so Bengali words merge.
        assert!(rebuilt.encode("শুভ সকাল").unwrap().len() < bytes_only);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_tokenizer_file_is_an_error() {
        let (store, _) = temp_store("missing");
        assert!(store.load(LanguageSide::Target).is_err());
    }
}
