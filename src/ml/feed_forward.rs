use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

/// Position-wise feed-forward: embed → hidden → ReLU → dropout → embed.
#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    pub embed_size:  usize,
    pub hidden_size: usize,
    #[config(default = 0.1)]
    pub dropout:     f64,
}

impl FeedForwardConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FeedForward<B> {
        FeedForward {
            expand:  LinearConfig::new(self.embed_size, self.hidden_size).init(device),
            project: LinearConfig::new(self.hidden_size, self.embed_size).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    expand:  Linear<B>,
    project: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> FeedForward<B> {
    /// [batch, seq, embed] → [batch, seq, embed]; positions never mix.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let hidden = relu(self.expand.forward(x));
        self.project.forward(self.dropout.forward(hidden))
    }
}
