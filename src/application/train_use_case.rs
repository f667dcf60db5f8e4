// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full run in order:
//
//   Step 1: Load training pairs          (Layer 4 - data)
//   Step 2: Clean the text               (Layer 4 - data)
//   Step 3: Build / load tokenizers      (Layer 6 - infra)
//   Step 4: Encode, frame and pad        (Layer 4 - data)
//   Step 5: Save config                  (Layer 2)
//   Step 6: Run training loop            (Layer 5 - ml)
//   Step 7: Translate sentence / file    (Layer 5 - ml)
//   Step 8: Export translations          (Layer 6 - infra)
//
// The backend is picked once here and threaded through as a
// type parameter; nothing below this layer chooses a device.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, ensure, Context, Result};
use burn::backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu};
use burn::module::AutodiffModule;
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::data::{
    dataset::{TranslationDataset, TranslationSample},
    loader::JsonCorpus,
    padding::{exceeds, pad_sequences, wrap_target},
    preprocessor::Preprocessor,
};
use crate::domain::{
    sentence_pair::SentencePair,
    tokens::LanguageSide,
    traits::{PairSource, RecordSource, Translate},
};
use crate::infra::{
    export::TranslationExporter,
    metrics::MetricsLogger,
    tokenizer_store::{SubwordTokenizer, TokenizerKey, TokenizerStore},
};
use crate::ml::{
    decoder::GreedyDecoder,
    model::TransformerConfig,
    trainer::{run_training, TrainingOptions},
    translator::Translator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Wgpu,
    NdArray,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Written to <output_dir>/train_config.json
// so a run can be reproduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_file:     String,
    pub valid_file:     Option<String>,
    pub pair:           String,
    pub reverse:        bool,
    pub output_dir:     String,
    pub backend:        BackendKind,
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub max_seq_len:    usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub embed_size:     usize,
    pub num_heads:      usize,
    pub num_layers:     usize,
    pub ff_hidden_size: usize,
    pub dropout:        f64,
    pub max_positions:  usize,
    pub decode_max_len: usize,
    pub seed:           u64,
    pub sentence:       Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_file:     "data/train.json".to_string(),
            valid_file:     None,
            pair:           "English-Bengali".to_string(),
            reverse:        false,
            output_dir:     "output".to_string(),
            backend:        BackendKind::Wgpu,
            src_vocab_size: 30000,
            tgt_vocab_size: 30000,
            max_seq_len:    50,
            batch_size:     32,
            epochs:         10,
            lr:             1e-4,
            embed_size:     256,
            num_heads:      8,
            num_layers:     6,
            ff_hidden_size: 2048,
            dropout:        0.1,
            max_positions:  1000,
            decode_max_len: 50,
            seed:           42,
            sentence:       None,
        }
    }
}

impl TrainConfig {
    /// Checks that do not need the corpus.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_seq_len >= 2, "max_seq_len must be at least 2 (BOS + EOS)");
        ensure!(
            self.max_seq_len <= self.max_positions,
            "max_seq_len ({}) exceeds max_positions ({})",
            self.max_seq_len,
            self.max_positions
        );
        ensure!(self.decode_max_len >= 1, "decode_max_len must be at least 1");
        ensure!(
            self.decode_max_len <= self.max_positions,
            "decode_max_len ({}) exceeds max_positions ({})",
            self.decode_max_len,
            self.max_positions
        );
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.epochs > 0, "epochs must be positive");
        ensure!((0.0..1.0).contains(&self.dropout), "dropout must be in [0, 1)");
        Ok(())
    }

    /// Identifies the tokenizer each side needs for this run.
    pub fn tokenizer_key(&self, side: LanguageSide) -> TokenizerKey {
        let vocab_size = match side {
            LanguageSide::Source => self.src_vocab_size,
            LanguageSide::Target => self.tgt_vocab_size,
        };
        TokenizerKey::new(side.language(&self.pair, self.reverse), vocab_size)
    }

    fn model_config(&self, src_vocab: usize, tgt_vocab: usize) -> TransformerConfig {
        TransformerConfig::new(src_vocab, tgt_vocab)
            .with_embed_size(self.embed_size)
            .with_num_heads(self.num_heads)
            .with_num_layers(self.num_layers)
            .with_ff_hidden_size(self.ff_hidden_size)
            .with_dropout(self.dropout)
            .with_max_positions(self.max_positions)
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct TrainReport {
    pub loss_history:         Vec<f64>,
    pub sentence_translation: Option<String>,
    pub translations:         Option<BTreeMap<String, String>>,
    pub exported:             Vec<PathBuf>,
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        self.config.validate()?;
        match self.config.backend {
            BackendKind::Wgpu => {
                tracing::info!("Using wgpu backend");
                self.execute_on::<Wgpu>(WgpuDevice::default())
            }
            BackendKind::NdArray => {
                tracing::info!("Using ndarray backend");
                self.execute_on::<NdArray>(NdArrayDevice::default())
            }
        }
    }

    fn execute_on<B: Backend>(&self, device: B::Device) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Load training pairs ──────────────────────────────────────
        let corpus = JsonCorpus::new(&cfg.train_file, &cfg.pair);
        let mut pairs = corpus.load_pairs()?;
        if cfg.reverse {
            tracing::info!("Reversing direction: target → source");
            pairs = pairs.into_iter().map(SentencePair::reversed).collect();
        }
        if pairs.is_empty() {
            bail!("No training pairs in '{}'", cfg.train_file);
        }

        // ── Step 2: Clean text ───────────────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let sources: Vec<String> = pairs.iter().map(|p| preprocessor.clean(&p.source)).collect();
        let targets: Vec<String> = pairs.iter().map(|p| preprocessor.clean(&p.target)).collect();

        // ── Step 3: Tokenizers ───────────────────────────────────────────────
        let store      = TokenizerStore::new(&cfg.output_dir);
        let source_tok = store.load_or_build(
            LanguageSide::Source,
            &cfg.tokenizer_key(LanguageSide::Source),
            &sources,
        )?;
        let target_tok = store.load_or_build(
            LanguageSide::Target,
            &cfg.tokenizer_key(LanguageSide::Target),
            &targets,
        )?;

        // ── Step 4: Samples ──────────────────────────────────────────────────
        let (samples, truncated) =
            build_samples(&sources, &targets, &source_tok, &target_tok, cfg.max_seq_len)?;
        if truncated > 0 {
            tracing::warn!(
                "{} sequences longer than max_seq_len={} were truncated",
                truncated,
                cfg.max_seq_len
            );
        }
        tracing::info!("Built {} training samples", samples.len());

        // ── Step 5: Save config ──────────────────────────────────────────────
        save_config(cfg)?;

        // ── Step 6: Train ────────────────────────────────────────────────────
        let model_cfg = cfg.model_config(source_tok.vocab_size(), target_tok.vocab_size());
        let opts = TrainingOptions {
            epochs:     cfg.epochs,
            batch_size: cfg.batch_size,
            lr:         cfg.lr,
            seed:       cfg.seed,
        };
        let metrics = MetricsLogger::new(&cfg.output_dir)?;
        let outcome = run_training::<Autodiff<B>>(
            &opts,
            &model_cfg,
            TranslationDataset::new(samples),
            &metrics,
            device.clone(),
        )?;

        // ── Step 7: Translate ────────────────────────────────────────────────
        let translator = Translator::<B>::new(
            outcome.model.valid(),
            source_tok,
            target_tok,
            GreedyDecoder::new(cfg.decode_max_len),
            cfg.max_seq_len,
            device,
        )?;

        let sentence_translation = match &cfg.sentence {
            Some(sentence) => {
                let out = translator.translate(sentence)?;
                tracing::info!("'{}' → '{}'", sentence, out);
                Some(out)
            }
            None => None,
        };

        // ── Step 8: Validation file + export ─────────────────────────────────
        let (translations, exported) = match &cfg.valid_file {
            Some(path) => {
                let records = JsonCorpus::new(path, &cfg.pair).load_records()?;
                let translated = translator.translate_records(&records)?;
                let exported = TranslationExporter::new(&cfg.output_dir).write_all(&translated)?;
                (Some(translated), exported)
            }
            None => (None, Vec::new()),
        };

        Ok(TrainReport {
            loss_history: outcome.loss_history,
            sentence_translation,
            translations,
            exported,
        })
    }
}

/// Encode both sides, frame targets with BOS/EOS, pad to
/// `max_len`. Also returns how many sequences (either side) were cut.
fn build_samples(
    sources:    &[String],
    targets:    &[String],
    source_tok: &SubwordTokenizer,
    target_tok: &SubwordTokenizer,
    max_len:    usize,
) -> Result<(Vec<TranslationSample>, usize)> {
    let src_ids = sources
        .iter()
        .map(|s| source_tok.encode(s))
        .collect::<Result<Vec<_>>>()?;
    let tgt_ids = targets
        .iter()
        .map(|t| Ok::<_, anyhow::Error>(wrap_target(&target_tok.encode(t)?)))
        .collect::<Result<Vec<_>>>()?;

    let truncated = src_ids
        .iter()
        .chain(&tgt_ids)
        .filter(|ids| exceeds(ids, max_len))
        .count();

    let samples: Vec<TranslationSample> = pad_sequences(&src_ids, max_len)
        .into_iter()
        .zip(pad_sequences(&tgt_ids, max_len))
        .map(|(source, target)| TranslationSample { source, target })
        .collect();

    let target_tokens: usize = samples.iter().map(TranslationSample::target_tokens).sum();
    tracing::debug!("{} target tokens after padding (PAD excluded)", target_tokens);
    Ok((samples, truncated))
}

fn save_config(cfg: &TrainConfig) -> Result<()> {
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("Cannot create '{}'", cfg.output_dir))?;
    let path = PathBuf::from(&cfg.output_dir).join("train_config.json");
    fs::write(&path, serde_json::to_string_pretty(cfg)?)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::info!("Config saved to '{}'", path.display());
    Ok(())
}
