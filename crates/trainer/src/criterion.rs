use serde::{Deserialize, Serialize};
use tch::Tensor;

/// Pluggable loss slot handed to the trainer.
pub trait Criterion {
    fn compute(&self, input: &Tensor, target: &Tensor) -> Tensor;
}

/// Pass-through criterion for models that compute their loss internally: the
/// model's forward output already is the loss, and the trainer must not wrap
/// it again. Selected at configuration time, not special-cased in the loop.
pub struct IdentityCriterion;

impl Criterion for IdentityCriterion {
    fn compute(&self, input: &Tensor, _target: &Tensor) -> Tensor {
        input.shallow_clone()
    }
}

pub struct CrossEntropyCriterion;

impl Criterion for CrossEntropyCriterion {
    fn compute(&self, input: &Tensor, target: &Tensor) -> Tensor {
        input.cross_entropy_for_logits(target)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CriterionKind {
    Identity,
    CrossEntropy,
}

impl CriterionKind {
    pub fn build(&self) -> Box<dyn Criterion> {
        match self {
            CriterionKind::Identity => Box::new(IdentityCriterion),
            CriterionKind::CrossEntropy => Box::new(CrossEntropyCriterion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passes_input_through() {
        let criterion = CriterionKind::Identity.build();
        let input = Tensor::from_slice(&[1.5f64, -2.0, 0.25]);
        let target = Tensor::from_slice(&[0i64, 1, 2]);
        let out = criterion.compute(&input, &target);
        assert_eq!(out, input);
    }
}
