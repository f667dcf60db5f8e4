// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `train`    — build tokenizers, train, translate
//   2. `tokenize` — inspect one sentence's token ids
//
// Reference: Rust Book §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TokenizeArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "nmt-transformer",
    version = "0.1.0",
    about = "Train an English↔Bengali Transformer translator and translate with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Tokenize(args) => Self::run_tokenize(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.train_file);
        let report = TrainUseCase::new(args.into()).execute()?;

        if let Some(loss) = report.loss_history.last() {
            println!("Training complete. Final loss: {:.4}", loss);
        }
        if let Some(text) = &report.sentence_translation {
            println!("\nTranslation: {}", text);
        }
        if let Some(translations) = &report.translations {
            println!("Translated {} records", translations.len());
        }
        for path in &report.exported {
            println!("  wrote {}", path.display());
        }
        Ok(())
    }

    fn run_tokenize(args: TokenizeArgs) -> Result<()> {
        use crate::application::tokenize_use_case::TokenizeUseCase;

        let report = TokenizeUseCase::new((&args).into()).execute(&args.sentence)?;
        println!("vocab size : {}", report.vocab_size);
        println!("ids        : {:?}", report.ids);
        println!("padded     : {:?} ({} special)", report.padded, report.special_count());
        println!("round trip : {}", report.round_trip);
        Ok(())
    }
}
