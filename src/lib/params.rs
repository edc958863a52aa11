use anyhow::{bail, Result};
use std::fmt;

/// Probabilities of the generative model for a diagnostic test.
///
/// Only constructed through `new`, so every field is a probability in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GenerativeParams {
    /// P(Y=1), incidence of the disease
    p_prior: f64,
    /// P(X=1 | Y=1)
    p_sensitivity: f64,
    /// P(X=1 | Y=0)
    p_false_positive: f64,
}

impl GenerativeParams {
    pub fn new(p_prior: f64, p_sensitivity: f64, p_false_positive: f64) -> Result<Self> {
        check_probability("p_prior", p_prior)?;
        check_probability("p_sensitivity", p_sensitivity)?;
        check_probability("p_false_positive", p_false_positive)?;
        Ok(Self {
            p_prior,
            p_sensitivity,
            p_false_positive,
        })
    }

    pub fn p_prior(&self) -> f64 {
        self.p_prior
    }

    pub fn p_sensitivity(&self) -> f64 {
        self.p_sensitivity
    }

    pub fn p_false_positive(&self) -> f64 {
        self.p_false_positive
    }

    /// P(Y=1 | X=1) under the true parameters.
    ///
    /// Returns `None` when the test can never come back positive.
    pub fn analytic_posterior(&self) -> Option<f64> {
        let positive_and_diseased = self.p_sensitivity * self.p_prior;
        let evidence = positive_and_diseased + self.p_false_positive * (1.0 - self.p_prior);
        if evidence == 0.0 {
            return None;
        }
        Some(positive_and_diseased / evidence)
    }
}

impl fmt::Display for GenerativeParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "prior = {}, sensitivity = {}, false positive rate = {}",
            self.p_prior, self.p_sensitivity, self.p_false_positive
        )
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        bail!("{} must be a probability in [0, 1], got {}", name, p);
    }
    Ok(())
}
