// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Teacher-forced next-token training with Adam.
//
// Per batch:
//   tgt_input  = target[:, :-1]   [BOS, w1, ..., wN]
//   tgt_output = target[:, 1:]    [w1, ..., wN, EOS]
//   logits     = model(source, tgt_input)
//   loss       = cross-entropy(logits, tgt_output), PAD ignored
//   one Adam step
//
// Batches run strictly in sequence. The model is moved into
// the optimizer step and handed back, so there is exactly one
// owner of the parameters at any time. No validation pass,
// early stopping or gradient clipping.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::log_softmax, backend::AutodiffBackend},
};

use crate::data::{
    batcher::{TranslationBatch, TranslationBatcher},
    dataset::TranslationDataset,
};
use crate::domain::tokens::PAD_ID;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{Transformer, TransformerConfig};

/// Loop settings; the architecture lives in `TransformerConfig`.
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub epochs:     usize,
    pub batch_size: usize,
    pub lr:         f64,
    pub seed:       u64,
}

/// Trained model plus the average loss of every epoch.
pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:        Transformer<B>,
    pub loss_history: Vec<f64>,
}

pub fn run_training<B: AutodiffBackend>(
    opts:      &TrainingOptions,
    model_cfg: &TransformerConfig,
    dataset:   TranslationDataset,
    metrics:   &MetricsLogger,
    device:    B::Device,
) -> Result<TrainingOutcome<B>> {
    B::seed(opts.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Transformer<B> = model_cfg.init(&device)?;
    tracing::info!(
        "Model ready: {} layers, embed_size={}, heads={}, {} parameters",
        model_cfg.num_layers,
        model_cfg.embed_size,
        model_cfg.num_heads,
        model.num_params(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-8)
        .init();

    // ── Data loader ───────────────────────────────────────────────────────────
    let samples = dataset.sample_count();
    let loader  = DataLoaderBuilder::new(TranslationBatcher::<B>::new(device.clone()))
        .batch_size(opts.batch_size)
        .shuffle(opts.seed)
        .num_workers(1)
        .build(dataset);
    tracing::info!("Training on {} samples, batch_size={}", samples, opts.batch_size);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut loss_history = Vec::with_capacity(opts.epochs);
    let mut best_loss    = f64::INFINITY;

    for epoch in 1..=opts.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let (next, loss) = train_step(model, &mut optim, batch, opts.lr);
            model = next;
            if let Some(loss) = loss {
                loss_sum += loss;
                batches  += 1;
            }
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        loss_history.push(avg_loss);

        println!("Epoch {:>3}/{} | loss={:.4}", epoch, opts.epochs, avg_loss);
        let m = EpochMetrics::new(epoch, avg_loss, batches);
        if m.improved_on(best_loss) {
            tracing::debug!("Epoch {}: new best loss {:.4}", epoch, avg_loss);
            best_loss = avg_loss;
        }
        metrics.log(&m)?;
    }

    tracing::info!(
        "Training complete (best loss {:.4}), metrics in '{}'",
        best_loss,
        metrics.csv_path().display()
    );
    Ok(TrainingOutcome { model, loss_history })
}

/// One teacher-forced update. Returns the updated model and the
/// batch loss; an empty batch (or a target shorter than two ids)
/// returns the model untouched and `None`.
pub fn train_step<B, O>(
    model: Transformer<B>,
    optim: &mut O,
    batch: TranslationBatch<B>,
    lr:    f64,
) -> (Transformer<B>, Option<f64>)
where
    B: AutodiffBackend,
    O: Optimizer<Transformer<B>, B>,
    Transformer<B>: AutodiffModule<B>,
{
    if batch.is_empty() {
        return (model, None);
    }
    let batch_size = batch.len();
    let tgt_len    = batch.target.dims()[1];
    if tgt_len < 2 {
        return (model, None);
    }

    let tgt_input  = batch.target.clone().slice([0..batch_size, 0..tgt_len - 1]);
    let tgt_output = batch.target.slice([0..batch_size, 1..tgt_len]);

    let logits = model.forward_masked(batch.source, tgt_input);
    let loss   = masked_cross_entropy(logits, tgt_output, PAD_ID);
    let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    (optim.step(lr, model, grads), Some(loss_value))
}

/// Mean token cross-entropy over non-PAD targets.
///
/// logits: [batch, steps, vocab], targets: [batch, steps] → [1]
pub fn masked_cross_entropy<B: Backend>(
    logits:  Tensor<B, 3>,
    targets: Tensor<B, 2, Int>,
    pad_id:  u32,
) -> Tensor<B, 1> {
    let [batch_size, steps, vocab] = logits.dims();
    let n = batch_size * steps;

    let log_probs = log_softmax(logits.reshape([n, vocab]), 1);
    let targets   = targets.reshape([n]);
    let picked    = log_probs.gather(1, targets.clone().reshape([n, 1])).reshape([n]);

    let keep  = targets.not_equal_elem(pad_id as i32).float();
    let count = keep.clone().sum().clamp_min(1.0);
    (picked * keep).sum().neg() / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::TranslationSample;
    use burn::backend::{Autodiff, NdArray};
    use burn::data::dataloader::batcher::Batcher;
    use burn::tensor::TensorData;

    type TestBackend = Autodiff<NdArray>;

    fn tiny_config() -> TransformerConfig {
        TransformerConfig::new(10, 10)
            .with_embed_size(16)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_ff_hidden_size(32)
            .with_dropout(0.0)
            .with_max_positions(16)
    }

    fn sample() -> TranslationSample {
        // "hello" → "hola" as ids
        TranslationSample {
            source: vec![5, 6, 0, 0, 0, 0],
            target: vec![2, 7, 8, 3, 0, 0],
        }
    }

    fn temp_metrics(name: &str) -> MetricsLogger {
        let dir = std::env::temp_dir().join(format!("nmt_trainer_{}_{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        MetricsLogger::new(dir.to_string_lossy().to_string()).unwrap()
    }

    #[test]
    fn test_cross_entropy_ignores_pad_targets() {
        let device = Default::default();
        // Two positions; the second target is PAD and has a terrible logit.
        let logits = Tensor::<NdArray, 3>::from_data(
            TensorData::new(vec![0.0f32, 5.0, 0.0, 9.0, 0.0, 0.0], [1, 2, 3]),
            &device,
        );
        let with_pad = Tensor::<NdArray, 2, Int>::from_data(
            TensorData::new(vec![1i32, PAD_ID as i32], [1, 2]),
            &device,
        );
        let only_first = Tensor::<NdArray, 3>::from_data(
            TensorData::new(vec![0.0f32, 5.0, 0.0], [1, 1, 3]),
            &device,
        );
        let first_target = Tensor::<NdArray, 2, Int>::from_data(
            TensorData::new(vec![1i32], [1, 1]),
            &device,
        );

        let a = masked_cross_entropy(logits, with_pad, PAD_ID).into_scalar();
        let b = masked_cross_entropy(only_first, first_target, PAD_ID).into_scalar();
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let device = Default::default();
        let model: Transformer<TestBackend> = tiny_config().init(&device).unwrap();
        let mut optim = AdamConfig::new().init();

        let inputs = || {
            (
                Tensor::<TestBackend, 2, Int>::from_data(TensorData::new(vec![5i32, 6], [1, 2]), &device),
                Tensor::<TestBackend, 2, Int>::from_data(TensorData::new(vec![2i32, 7], [1, 2]), &device),
            )
        };
        let (src, tgt) = inputs();
        let before: Vec<f32> = model.forward(src, tgt, None, None).into_data().to_vec().unwrap();

        let empty = TranslationBatcher::<TestBackend>::new(device.clone()).batch(Vec::new());
        let (model, loss) = train_step(model, &mut optim, empty, 1e-2);
        assert!(loss.is_none());

        let (src, tgt) = inputs();
        let after: Vec<f32> = model.forward(src, tgt, None, None).into_data().to_vec().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_step_changes_parameters() {
        let device = Default::default();
        let model: Transformer<TestBackend> = tiny_config().init(&device).unwrap();
        let mut optim = AdamConfig::new().init();
        let batch = TranslationBatcher::<TestBackend>::new(device).batch(vec![sample()]);

        let (model, first) = train_step(model, &mut optim, batch.clone(), 1e-3);
        let (_, second)    = train_step(model, &mut optim, batch, 1e-3);
        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(first.is_finite() && second.is_finite());
        assert!(second < first, "{second} !< {first}");
    }

    #[test]
    fn test_loss_decreases_over_epochs() {
        let device = Default::default();
        let opts = TrainingOptions { epochs: 15, batch_size: 1, lr: 5e-3, seed: 7 };
        let outcome = run_training::<TestBackend>(
            &opts,
            &tiny_config(),
            TranslationDataset::new(vec![sample()]),
            &temp_metrics("decrease"),
            device,
        )
        .unwrap();

        let history = outcome.loss_history;
        assert_eq!(history.len(), 15);
        assert!(history[14] < history[0], "{history:?}");
    }
}
