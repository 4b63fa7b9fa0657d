pub mod dataset;
pub mod criterion;

pub use criterion::{Criterion, CriterionKind, CrossEntropyCriterion, IdentityCriterion};
pub use dataset::BfsGraphDataset;

use serde::{Deserialize, Serialize};

/// Training-loop hyperparameters for the graph generator. Consumed by an
/// external trainer; this crate only declares and defaults them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub num_epochs: usize,
    pub random_seed: u64,
    pub use_clip_grad: bool,
    pub max_grad_norm: f64,
    /// Epochs at which the LR is multiplied by `lr_gamma` (multi-step decay).
    pub lr_milestones: Vec<usize>,
    pub lr_gamma: f64,
    pub criterion: CriterionKind,
    pub logdir: String,
    pub print_every: usize,
    pub save_every: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 3e-3,
            batch_size: 32,
            num_epochs: 3000,
            random_seed: 5,
            use_clip_grad: true,
            max_grad_norm: 10.0,
            lr_milestones: vec![400, 1000],
            lr_gamma: 0.3,
            criterion: CriterionKind::Identity,
            logdir: "./logs/graphrnn_log".to_string(),
            print_every: 1,
            save_every: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_yaml_round_trip() {
        let config = TrainerConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: TrainerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.batch_size, 32);
        assert_eq!(back.lr_milestones, vec![400, 1000]);
        assert!(matches!(back.criterion, CriterionKind::Identity));
    }
}
