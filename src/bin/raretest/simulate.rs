use crate::cli::Cli;
use anyhow::{bail, Result};
use log::{debug, info, warn};
use raretest_utils::params::GenerativeParams;
use raretest_utils::report::Report;
use raretest_utils::sample;
use std::time::Instant;

pub fn raretest(args: &Cli) -> Result<Report> {
    let global_timer = Instant::now();
    if args.m == 0 {
        bail!("Number of patients must be positive");
    }
    let params =
        GenerativeParams::new(args.p_prior, args.p_sensitivity, args.p_false_positive)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Simulating {} patients with {}", args.m, params);
    info!("Seed: {}", seed);

    let expected_diseased = args.m as f64 * params.p_prior();
    if expected_diseased < 10.0 {
        warn!(
            "Only {:.1} diseased patients expected, sensitivity estimate will be unreliable",
            expected_diseased
        );
    }

    let timer = Instant::now();
    let sample = sample::generate_par(args.m, &params, seed);
    debug!("Generated sample in {:.2?}", timer.elapsed());

    let counts = sample.counts();
    info!(
        "Diseased: {}, healthy: {}, true positives: {}, false positives: {}",
        counts.n_diseased(),
        counts.n_healthy(),
        counts.n_true_positive(),
        counts.n_false_positive()
    );

    let report = Report::new(seed, params, counts)?;
    if let Some(analytic) = report.analytic_posterior {
        info!(
            "P(disease | positive test): estimated {:.6}, analytic {:.6}",
            report.p_cancer_given_positive_test, analytic
        );
    }
    info!("Total time: {:.2?}", global_timer.elapsed());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{LogLevel, OutputFormat};

    fn args(m: usize, p_prior: f64) -> Cli {
        Cli {
            m,
            p_prior,
            p_sensitivity: 0.9,
            p_false_positive: 0.01,
            seed: Some(3),
            threads: 1,
            format: OutputFormat::Plain,
            verbosity: LogLevel::Silent,
        }
    }

    #[test]
    fn test_raretest_reproducible() {
        let a = raretest(&args(200_000, 0.05)).unwrap();
        let b = raretest(&args(200_000, 0.05)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 3);
        assert!((a.estimates.theta_prior - 0.05).abs() < 0.01);
    }

    #[test]
    fn test_raretest_rejects_empty() {
        assert!(raretest(&args(0, 0.05)).is_err());
    }

    #[test]
    fn test_raretest_rejects_invalid_probability() {
        assert!(raretest(&args(100, 1.5)).is_err());
    }

    #[test]
    fn test_raretest_degenerate_prior() {
        let err = raretest(&args(1000, 0.0)).unwrap_err();
        assert!(err.to_string().contains("no diseased patients"));
    }
}
