use crate::params::GenerativeParams;
use anyhow::{anyhow, bail, Result};
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::Add;

/// Number of patients simulated per rng stream in `generate_par`.
pub const CHUNK_SIZE: usize = 1 << 16;

/// Disease status and test outcome of a simulated population.
///
/// `y[i]` is 1 when patient `i` has the disease, `x[i]` is 1 when the test
/// for patient `i` came back positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    y: Vec<u8>,
    x: Vec<u8>,
}

impl Sample {
    pub fn from_columns(y: Vec<u8>, x: Vec<u8>) -> Result<Self> {
        if y.len() != x.len() {
            bail!(
                "Disease and test columns differ in length: {} vs {}",
                y.len(),
                x.len()
            );
        }
        if let Some(i) = y.iter().chain(x.iter()).position(|&v| v > 1) {
            bail!(
                "Non-binary value at position {} of the sample",
                i % y.len().max(1)
            );
        }
        Ok(Self { y, x })
    }

    pub fn y(&self) -> &[u8] {
        &self.y
    }

    pub fn x(&self) -> &[u8] {
        &self.x
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts {
            n: self.len() as u64,
            ..Counts::default()
        };
        for (&y, &x) in self.y.iter().zip(self.x.iter()) {
            match (y, x) {
                (1, 1) => {
                    counts.n_diseased += 1;
                    counts.n_true_positive += 1;
                }
                (1, _) => counts.n_diseased += 1,
                (_, 1) => {
                    counts.n_healthy += 1;
                    counts.n_false_positive += 1;
                }
                _ => counts.n_healthy += 1,
            }
        }
        counts
    }
}

/// Sufficient statistics of a `Sample`.
///
/// Built by `Sample::counts` or `Counts::new`, so true and false positives
/// never exceed the diseased and healthy patients they are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Counts {
    n: u64,
    n_diseased: u64,
    n_healthy: u64,
    n_true_positive: u64,
    n_false_positive: u64,
}

impl Counts {
    pub fn new(
        n_diseased: u64,
        n_healthy: u64,
        n_true_positive: u64,
        n_false_positive: u64,
    ) -> Result<Self> {
        if n_true_positive > n_diseased {
            bail!(
                "{} true positives among only {} diseased patients",
                n_true_positive,
                n_diseased
            );
        }
        if n_false_positive > n_healthy {
            bail!(
                "{} false positives among only {} healthy patients",
                n_false_positive,
                n_healthy
            );
        }
        let n = n_diseased
            .checked_add(n_healthy)
            .ok_or_else(|| anyhow!("Patient count overflows u64"))?;
        Ok(Self {
            n,
            n_diseased,
            n_healthy,
            n_true_positive,
            n_false_positive,
        })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn n_diseased(&self) -> u64 {
        self.n_diseased
    }

    pub fn n_healthy(&self) -> u64 {
        self.n_healthy
    }

    pub fn n_true_positive(&self) -> u64 {
        self.n_true_positive
    }

    pub fn n_false_positive(&self) -> u64 {
        self.n_false_positive
    }

    /// Diseased patients whose test came back negative.
    pub fn n_false_negative(&self) -> u64 {
        self.n_diseased - self.n_true_positive
    }

    /// Healthy patients whose test came back negative.
    pub fn n_true_negative(&self) -> u64 {
        self.n_healthy - self.n_false_positive
    }

    pub fn n_positive_tests(&self) -> u64 {
        self.n_true_positive + self.n_false_positive
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, other: Counts) -> Counts {
        Counts {
            n: self.n + other.n,
            n_diseased: self.n_diseased + other.n_diseased,
            n_healthy: self.n_healthy + other.n_healthy,
            n_true_positive: self.n_true_positive + other.n_true_positive,
            n_false_positive: self.n_false_positive + other.n_false_positive,
        }
    }
}

/// Simulate `m` independent patients, drawing from `rng` in patient order.
pub fn generate<R: Rng + ?Sized>(m: usize, params: &GenerativeParams, rng: &mut R) -> Sample {
    let mut y = Vec::with_capacity(m);
    let mut x = Vec::with_capacity(m);
    fill(&mut y, &mut x, m, params, rng);
    Sample { y, x }
}

/// Simulate `m` patients in chunks of `CHUNK_SIZE` on the rayon pool.
///
/// Chunk `k` draws from its own `SmallRng` seeded with `seed + k`, so the
/// result only depends on `seed` and not on the number of threads.
pub fn generate_par(m: usize, params: &GenerativeParams, seed: u64) -> Sample {
    let n_chunks = m.div_ceil(CHUNK_SIZE);
    debug!("Generating {} patients in {} chunks", m, n_chunks);
    let chunks: Vec<(Vec<u8>, Vec<u8>)> = (0..n_chunks)
        .into_par_iter()
        .map(|k| {
            let len = CHUNK_SIZE.min(m - k * CHUNK_SIZE);
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(k as u64));
            let mut y = Vec::with_capacity(len);
            let mut x = Vec::with_capacity(len);
            fill(&mut y, &mut x, len, params, &mut rng);
            (y, x)
        })
        .collect();

    let mut y = Vec::with_capacity(m);
    let mut x = Vec::with_capacity(m);
    for (chunk_y, chunk_x) in chunks {
        y.extend_from_slice(&chunk_y);
        x.extend_from_slice(&chunk_x);
    }
    Sample { y, x }
}

#[inline(always)]
fn fill<R: Rng + ?Sized>(
    y: &mut Vec<u8>,
    x: &mut Vec<u8>,
    len: usize,
    params: &GenerativeParams,
    rng: &mut R,
) {
    for _ in 0..len {
        let diseased = rng.random_bool(params.p_prior());
        let p_positive = if diseased {
            params.p_sensitivity()
        } else {
            params.p_false_positive()
        };
        let positive = rng.random_bool(p_positive);
        y.push(diseased as u8);
        x.push(positive as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(p_prior: f64, p_sensitivity: f64, p_false_positive: f64) -> GenerativeParams {
        GenerativeParams::new(p_prior, p_sensitivity, p_false_positive).unwrap()
    }

    #[test]
    fn test_generate_length_and_values() {
        let mut rng = SmallRng::seed_from_u64(42);
        for m in [1, 7, 1000] {
            let sample = generate(m, &params(0.3, 0.8, 0.1), &mut rng);
            assert_eq!(sample.y().len(), m);
            assert_eq!(sample.x().len(), m);
            assert!(sample.y().iter().all(|&v| v <= 1));
            assert!(sample.x().iter().all(|&v| v <= 1));
        }
    }

    #[test]
    fn test_generate_empty() {
        let mut rng = SmallRng::seed_from_u64(42);
        let sample = generate(0, &params(0.3, 0.8, 0.1), &mut rng);
        assert!(sample.is_empty());
        assert_eq!(sample.counts(), Counts::default());
    }

    #[test]
    fn test_generate_same_seed_same_sample() {
        let mut rng1 = SmallRng::seed_from_u64(123);
        let mut rng2 = SmallRng::seed_from_u64(123);
        let p = params(0.2, 0.7, 0.05);
        assert_eq!(generate(5000, &p, &mut rng1), generate(5000, &p, &mut rng2));
    }

    #[test]
    fn test_generate_degenerate_probabilities() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sample = generate(2000, &params(0.0, 1.0, 0.0), &mut rng);
        assert!(sample.y().iter().all(|&v| v == 0));
        assert!(sample.x().iter().all(|&v| v == 0));

        let sample = generate(2000, &params(1.0, 1.0, 1.0), &mut rng);
        assert!(sample.y().iter().all(|&v| v == 1));
        assert!(sample.x().iter().all(|&v| v == 1));

        let sample = generate(2000, &params(1.0, 0.0, 1.0), &mut rng);
        assert!(sample.x().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_generate_par_independent_of_pool_size() {
        let p = params(0.1, 0.9, 0.2);
        let m = 3 * CHUNK_SIZE + 17;
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| generate_par(m, &p, 99));
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| generate_par(m, &p, 99));
        assert_eq!(single.len(), m);
        assert_eq!(single, many);
    }

    #[test]
    fn test_generate_par_first_chunk_matches_sequential() {
        let p = params(0.1, 0.9, 0.2);
        let par = generate_par(100, &p, 5);
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(par, generate(100, &p, &mut rng));
    }

    #[test]
    fn test_from_columns_validation() {
        assert!(Sample::from_columns(vec![0, 1], vec![1]).is_err());
        assert!(Sample::from_columns(vec![0, 2], vec![1, 0]).is_err());
        let sample = Sample::from_columns(vec![0, 1, 1], vec![1, 0, 1]).unwrap();
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_counts() {
        let sample = Sample::from_columns(
            vec![1, 1, 1, 0, 0, 0, 0],
            vec![1, 1, 0, 1, 0, 0, 0],
        )
        .unwrap();
        let counts = sample.counts();
        assert_eq!(counts, Counts::new(3, 4, 2, 1).unwrap());
        assert_eq!(counts.n(), 7);
        assert_eq!(counts.n_positive_tests(), 3);
        assert_eq!(counts.n_false_negative(), 1);
        assert_eq!(counts.n_true_negative(), 3);
    }

    #[test]
    fn test_counts_new_rejects_inconsistent() {
        assert!(Counts::new(2, 8, 5, 0).is_err());
        assert!(Counts::new(2, 8, 0, 9).is_err());
        assert!(Counts::new(u64::MAX, 1, 0, 0).is_err());
        let counts = Counts::new(2, 8, 2, 8).unwrap();
        assert_eq!(counts.n(), 10);
        assert_eq!(counts.n_false_negative(), 0);
        assert_eq!(counts.n_true_negative(), 0);
    }

    #[test]
    fn test_counts_merge() {
        let mut rng = SmallRng::seed_from_u64(11);
        let p = params(0.4, 0.6, 0.3);
        let a = generate(300, &p, &mut rng);
        let b = generate(500, &p, &mut rng);
        let joined =
            Sample::from_columns([a.y(), b.y()].concat(), [a.x(), b.x()].concat()).unwrap();
        assert_eq!(a.counts() + b.counts(), joined.counts());
    }
}
