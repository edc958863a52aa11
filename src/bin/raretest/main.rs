use clap::Parser;
use env_logger::Env;
use log::info;
use anyhow::Result;

mod cli;
mod simulate;
fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    match args.verbosity {
        cli::LogLevel::Silent => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        cli::LogLevel::Normal => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
        }
        cli::LogLevel::Verbose => {
            env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();
        }
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    // Run the main function
    info!("Running rare disease test simulation");
    let report = simulate::raretest(&args)?;
    let output = match args.format {
        cli::OutputFormat::Plain => report.to_plain(),
        cli::OutputFormat::Json => report.to_json()?,
    };
    println!("{}", output);
    info!("Finished");
    Ok(())
}
