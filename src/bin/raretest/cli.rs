// src/bin/raretest/cli.rs
use clap::{Parser, ValueEnum};
/// Simulate a diagnostic test for a rare disease and recover its parameters.
#[derive(Parser, Debug)]
#[command(
    name = "raretest",
    version,
    about = "Maximum likelihood estimation of a rare disease test"
)]
pub struct Cli {
    #[arg(
        long = "patients",
        short = 'm',
        default_value = "1000000",
        help = "Number of simulated patients"
    )]
    pub m: usize,

    #[arg(long, default_value = "0.0001", help = "P(disease), prior incidence")]
    pub p_prior: f64,

    #[arg(
        long,
        default_value = "0.9",
        help = "P(positive test | disease), sensitivity"
    )]
    pub p_sensitivity: f64,

    #[arg(
        long,
        default_value = "0.01",
        help = "P(positive test | no disease), false positive rate"
    )]
    pub p_false_positive: f64,

    #[arg(
        long,
        short,
        help = "Seed for the random number generator, drawn at random if absent"
    )]
    pub seed: Option<u64>,

    #[arg(long, short, default_value = "4", help = "Number of threads to use")]
    pub threads: usize,

    #[arg(
        value_enum,
        long,
        default_value = "plain",
        value_name = "FORMAT",
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(
        value_enum,
        long,
        default_value = "normal",
        value_name = "VERBOSITY",
        help = "Verbosity level"
    )]
    pub verbosity: LogLevel,
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Normal,
    Silent,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "verbose"),
            LogLevel::Normal => write!(f, "normal"),
            LogLevel::Silent => write!(f, "silent"),
        }
    }
}
