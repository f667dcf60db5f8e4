// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `tokenize`, and all
// their flags. Defaults match `TrainConfig::default()`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::tokenize_use_case::TokenizeConfig;
use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::domain::tokens::LanguageSide;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the translation model, then translate
    Train(TrainArgs),

    /// Show how a sentence is tokenised
    Tokenize(TokenizeArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    Wgpu,
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::NdArray,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SideArg {
    Source,
    Target,
}

impl From<SideArg> for LanguageSide {
    fn from(s: SideArg) -> Self {
        match s {
            SideArg::Source => LanguageSide::Source,
            SideArg::Target => LanguageSide::Target,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus JSON with a `<pair>.Train` mapping
    #[arg(long, default_value = "data/train.json")]
    pub train_file: String,

    /// JSON with a `Test` mapping to translate after training
    #[arg(long)]
    pub valid_file: Option<String>,

    /// Language-pair key inside the corpus files
    #[arg(long, default_value = "English-Bengali")]
    pub pair: String,

    /// Swap source and target (train Bengali → English)
    #[arg(long)]
    pub reverse: bool,

    /// Where tokenizers, metrics and translations are written
    #[arg(long, default_value = "output")]
    pub output_dir: String,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,

    #[arg(long, default_value_t = 30000)]
    pub src_vocab_size: usize,

    #[arg(long, default_value_t = 30000)]
    pub tgt_vocab_size: usize,

    /// Every sequence is padded or cut to this many ids
    #[arg(long, default_value_t = 50)]
    pub max_seq_len: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    /// Model width; must be divisible by --num-heads
    #[arg(long, default_value_t = 256)]
    pub embed_size: usize,

    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Blocks in each of the encoder and decoder stacks
    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    #[arg(long, default_value_t = 2048)]
    pub ff_hidden_size: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Length of the positional-encoding table
    #[arg(long, default_value_t = 1000)]
    pub max_positions: usize,

    /// Upper bound on generated ids, BOS included
    #[arg(long, default_value_t = 50)]
    pub decode_max_len: usize,

    /// Seeds weight init and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// A single sentence to translate after training
    #[arg(long)]
    pub sentence: Option<String>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_file:     a.train_file,
            valid_file:     a.valid_file,
            pair:           a.pair,
            reverse:        a.reverse,
            output_dir:     a.output_dir,
            backend:        a.backend.into(),
            src_vocab_size: a.src_vocab_size,
            tgt_vocab_size: a.tgt_vocab_size,
            max_seq_len:    a.max_seq_len,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            embed_size:     a.embed_size,
            num_heads:      a.num_heads,
            num_layers:     a.num_layers,
            ff_hidden_size: a.ff_hidden_size,
            dropout:        a.dropout,
            max_positions:  a.max_positions,
            decode_max_len: a.decode_max_len,
            seed:           a.seed,
            sentence:       a.sentence,
        }
    }
}

#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// The sentence to tokenise
    #[arg(long)]
    pub sentence: String,

    #[arg(long, value_enum, default_value_t = SideArg::Source)]
    pub side: SideArg,

    /// Used only when no tokenizer is saved yet
    #[arg(long, default_value = "data/train.json")]
    pub train_file: String,

    #[arg(long, default_value = "English-Bengali")]
    pub pair: String,

    #[arg(long)]
    pub reverse: bool,

    #[arg(long, default_value = "output")]
    pub output_dir: String,

    #[arg(long, default_value_t = 30000)]
    pub vocab_size: usize,

    #[arg(long, default_value_t = 50)]
    pub max_seq_len: usize,
}

impl From<&TokenizeArgs> for TokenizeConfig {
    fn from(a: &TokenizeArgs) -> Self {
        TokenizeConfig {
            train_file:  a.train_file.clone(),
            pair:        a.pair.clone(),
            reverse:     a.reverse,
            output_dir:  a.output_dir.clone(),
            side:        a.side.into(),
            vocab_size:  a.vocab_size,
            max_seq_len: a.max_seq_len,
        }
    }
}
