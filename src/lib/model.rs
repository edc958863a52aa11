use crate::estimate::{posterior, EstimateError};
use crate::sample::Counts;
use anyhow::{anyhow, bail, Result};
use log::debug;
use statrs::distribution::{Beta, ContinuousCDF};

/// A Beta-Bernoulli model
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BetaBernoulliModel {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaBernoulliModel {
    /// Create a new Beta-Bernoulli model with alpha=1.0, beta=1.0
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    pub fn new_with_params(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Update parameters with `n_success` successes and `n_failure` failures
    pub fn update(&mut self, n_success: u64, n_failure: u64) {
        self.alpha += n_success as f64;
        self.beta += n_failure as f64;
    }

    /// Compute mean of posterior
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let numerator = self.alpha * self.beta;
        let denominator = (self.alpha + self.beta).powi(2) * (self.alpha + self.beta + 1.0);
        numerator / denominator
    }

    /// Compute standard deviation of posterior
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Equal-tailed interval holding `level` of the posterior mass.
    pub fn credible_interval(&self, level: f64) -> Result<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            bail!("Credible level must be in (0, 1), got {}", level);
        }
        let dist = Beta::new(self.alpha, self.beta).map_err(|e| {
            anyhow!(
                "Invalid Beta parameters α = {}, β = {}: {}",
                self.alpha,
                self.beta,
                e
            )
        })?;
        let tail = (1.0 - level) / 2.0;
        Ok((dist.inverse_cdf(tail), dist.inverse_cdf(1.0 - tail)))
    }
}

impl Default for BetaBernoulliModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Posterior Beta models for prior, sensitivity and false positive rate,
/// each starting from a uniform Beta(1, 1).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BayesianEstimates {
    pub prior: BetaBernoulliModel,
    pub sensitivity: BetaBernoulliModel,
    pub false_positive: BetaBernoulliModel,
}

impl BayesianEstimates {
    pub fn from_counts(counts: &Counts) -> Self {
        let mut prior = BetaBernoulliModel::new();
        prior.update(counts.n_diseased(), counts.n_healthy());

        let mut sensitivity = BetaBernoulliModel::new();
        sensitivity.update(counts.n_true_positive(), counts.n_false_negative());

        let mut false_positive = BetaBernoulliModel::new();
        false_positive.update(counts.n_false_positive(), counts.n_true_negative());

        debug!("Prior posterior: α = {}, β = {}", prior.alpha, prior.beta);
        debug!(
            "Sensitivity posterior: α = {}, β = {}",
            sensitivity.alpha, sensitivity.beta
        );
        debug!(
            "False positive posterior: α = {}, β = {}",
            false_positive.alpha, false_positive.beta
        );
        Self {
            prior,
            sensitivity,
            false_positive,
        }
    }

    /// Bayes' rule applied to the posterior means.
    pub fn posterior(&self) -> Result<f64, EstimateError> {
        posterior(
            self.prior.mean(),
            self.sensitivity.mean(),
            self.false_positive.mean(),
        )
    }
}
