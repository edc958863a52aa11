use crate::sample::{Counts, Sample};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("sample is empty, cannot estimate the prior")]
    EmptySample,
    #[error("no diseased patients in the sample, sensitivity is undefined")]
    NoDiseased,
    #[error("no healthy patients in the sample, false positive rate is undefined")]
    NoHealthy,
    #[error("no positive tests implied by the estimates, posterior is undefined")]
    NoPositiveTests,
}

/// Maximum likelihood estimates, each defined or not on its own.
///
/// `theta_prior` only needs a non-empty sample, while `theta_positive` and
/// `theta_negative` need at least one diseased and one healthy patient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialEstimates {
    pub theta_prior: Result<f64, EstimateError>,
    pub theta_positive: Result<f64, EstimateError>,
    pub theta_negative: Result<f64, EstimateError>,
}

impl PartialEstimates {
    pub fn from_counts(counts: &Counts) -> Self {
        Self {
            theta_prior: ratio(counts.n_diseased(), counts.n(), EstimateError::EmptySample),
            theta_positive: ratio(
                counts.n_true_positive(),
                counts.n_diseased(),
                EstimateError::NoDiseased,
            ),
            theta_negative: ratio(
                counts.n_false_positive(),
                counts.n_healthy(),
                EstimateError::NoHealthy,
            ),
        }
    }

    /// All three estimates, or the first one that is undefined.
    pub fn complete(&self) -> Result<Estimates, EstimateError> {
        Ok(Estimates {
            theta_prior: self.theta_prior?,
            theta_positive: self.theta_positive?,
            theta_negative: self.theta_negative?,
        })
    }
}

/// Maximum likelihood estimates of the generative parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Estimates {
    pub theta_prior: f64,
    pub theta_positive: f64,
    pub theta_negative: f64,
}

impl Estimates {
    pub fn from_counts(counts: &Counts) -> Result<Self, EstimateError> {
        PartialEstimates::from_counts(counts).complete()
    }

    pub fn posterior(&self) -> Result<f64, EstimateError> {
        posterior(self.theta_prior, self.theta_positive, self.theta_negative)
    }

    /// Binomial standard error of each estimate, given the counts it came from.
    pub fn standard_errors(&self, counts: &Counts) -> StandardErrors {
        StandardErrors {
            theta_prior: binomial_se(self.theta_prior, counts.n()),
            theta_positive: binomial_se(self.theta_positive, counts.n_diseased()),
            theta_negative: binomial_se(self.theta_negative, counts.n_healthy()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StandardErrors {
    pub theta_prior: f64,
    pub theta_positive: f64,
    pub theta_negative: f64,
}

/// Frequency-count estimates of prior, sensitivity and false positive rate.
pub fn estimate(sample: &Sample) -> PartialEstimates {
    PartialEstimates::from_counts(&sample.counts())
}

/// P(Y=1 | X=1) by Bayes' rule.
pub fn posterior(
    theta_prior: f64,
    theta_positive: f64,
    theta_negative: f64,
) -> Result<f64, EstimateError> {
    let positive_and_diseased = theta_positive * theta_prior;
    let evidence = positive_and_diseased + theta_negative * (1.0 - theta_prior);
    if evidence == 0.0 {
        return Err(EstimateError::NoPositiveTests);
    }
    Ok(positive_and_diseased / evidence)
}

fn ratio(numerator: u64, denominator: u64, undefined: EstimateError) -> Result<f64, EstimateError> {
    if denominator == 0 {
        return Err(undefined);
    }
    Ok(numerator as f64 / denominator as f64)
}

fn binomial_se(theta: f64, n: u64) -> f64 {
    (theta * (1.0 - theta) / n as f64).sqrt()
}
