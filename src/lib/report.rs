use crate::estimate::{Estimates, StandardErrors};
use crate::model::{BayesianEstimates, BetaBernoulliModel};
use crate::params::GenerativeParams;
use crate::sample::Counts;
use anyhow::Result;
use serde::Serialize;

pub const CREDIBLE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredibleSummary {
    pub mean: f64,
    pub standard_deviation: f64,
    pub low: f64,
    pub high: f64,
}

impl CredibleSummary {
    fn from_model(model: &BetaBernoulliModel, level: f64) -> Result<Self> {
        let (low, high) = model.credible_interval(level)?;
        Ok(Self {
            mean: model.mean(),
            standard_deviation: model.standard_deviation(),
            low,
            high,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BayesianSummary {
    pub level: f64,
    pub prior: CredibleSummary,
    pub sensitivity: CredibleSummary,
    pub false_positive: CredibleSummary,
    pub p_cancer_given_positive_test: Option<f64>,
}

/// Everything known about one simulated run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub m: usize,
    pub seed: u64,
    pub params: GenerativeParams,
    pub counts: Counts,
    pub estimates: Estimates,
    pub standard_errors: StandardErrors,
    pub p_cancer_given_positive_test: f64,
    pub analytic_posterior: Option<f64>,
    pub bayesian: BayesianSummary,
}

impl Report {
    pub fn new(seed: u64, params: GenerativeParams, counts: Counts) -> Result<Self> {
        let estimates = Estimates::from_counts(&counts)?;
        let p_cancer_given_positive_test = estimates.posterior()?;

        let bayes = BayesianEstimates::from_counts(&counts);
        let bayesian = BayesianSummary {
            level: CREDIBLE_LEVEL,
            prior: CredibleSummary::from_model(&bayes.prior, CREDIBLE_LEVEL)?,
            sensitivity: CredibleSummary::from_model(&bayes.sensitivity, CREDIBLE_LEVEL)?,
            false_positive: CredibleSummary::from_model(&bayes.false_positive, CREDIBLE_LEVEL)?,
            p_cancer_given_positive_test: bayes.posterior().ok(),
        };

        Ok(Self {
            m: counts.n() as usize,
            seed,
            params,
            counts,
            standard_errors: estimates.standard_errors(&counts),
            estimates,
            p_cancer_given_positive_test,
            analytic_posterior: params.analytic_posterior(),
            bayesian,
        })
    }

    /// theta_prior, theta_positive, theta_negative and the posterior, one per line.
    pub fn to_plain(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.estimates.theta_prior,
            self.estimates.theta_positive,
            self.estimates.theta_negative,
            self.p_cancer_given_positive_test
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
