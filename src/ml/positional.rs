// ============================================================
// Layer 5 — Sinusoidal Positional Encoding
// ============================================================
// For position p and dimension pair (2i, 2i+1):
//
//   PE[p, 2i]   = sin(p / 10000^(2i / embed_size))
//   PE[p, 2i+1] = cos(p / 10000^(2i / embed_size))
//
// The table is computed once for positions 0..max_len and
// stored as a constant (non-trainable) tensor; forward slices
// the first seq_len rows. max_len is a hard ceiling that the
// model config validates against.

use burn::{prelude::*, tensor::TensorData};

#[derive(Config, Debug)]
pub struct PositionalEncodingConfig {
    pub embed_size: usize,
    #[config(default = 1000)]
    pub max_len:    usize,
}

impl PositionalEncodingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PositionalEncoding<B> {
        let values = sinusoid_table(self.max_len, self.embed_size);
        let table  = Tensor::<B, 2>::from_data(
            TensorData::new(values, [self.max_len, self.embed_size]),
            device,
        );
        PositionalEncoding { table, max_len: self.max_len }
    }
}

/// Row-major `[max_len, embed_size]` sinusoid table.
pub fn sinusoid_table(max_len: usize, embed_size: usize) -> Vec<f32> {
    let mut values = Vec::with_capacity(max_len * embed_size);
    for pos in 0..max_len {
        for dim in 0..embed_size {
            let pair  = (dim / 2 * 2) as f64;
            let angle = pos as f64 / 10000_f64.powf(pair / embed_size as f64);
            let value = if dim % 2 == 0 { angle.sin() } else { angle.cos() };
            values.push(value as f32);
        }
    }
    values
}

#[derive(Module, Debug)]
pub struct PositionalEncoding<B: Backend> {
    table:   Tensor<B, 2>,
    max_len: usize,
}

impl<B: Backend> PositionalEncoding<B> {
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// x: [batch, seq_len, embed] with seq_len <= max_len.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [_, seq_len, embed_size] = x.dims();
        let encoding = self
            .table
            .clone()
            .slice([0..seq_len, 0..embed_size])
            .unsqueeze::<3>();
        x + encoding
    }
}
