use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use riddler::{simulate, BirthsByDate, Config};

/// Expected number of people you meet before finding one whose birthday is today.
#[derive(Parser)]
#[command(name = "unbirthday")]
struct Cli {
    /// TOML config file. Defaults apply when it does not exist
    #[arg(long, default_value = "unbirthday.toml")]
    config: PathBuf,

    /// Number of Monte Carlo trials, overriding the config
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Seed for the random number generator, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the effective config back to the config path
    #[arg(long)]
    write_config: bool,

    /// Print the count and probability of every date
    #[arg(long)]
    dataset_summary: bool,

    /// Only print results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.write_config {
        config
            .save_to_file(&cli.config)
            .with_context(|| format!("writing {}", cli.config.display()))?;
    }

    if !cli.quiet {
        for source in config.sources.iter() {
            eprintln!("loading births from {}", source.location);
        }
    }
    let births = BirthsByDate::load(&config.sources).context("loading birth data")?;
    if !cli.quiet {
        eprintln!(
            "loaded {} births over {} dates",
            births.total(),
            births.len()
        );
    }

    if cli.dataset_summary {
        for (date, count) in births.iter() {
            println!("{} {} {:.6}", date, count, births.probability(date)?);
        }
    }

    let expected = births.closed_form_expectation()?;
    println!("expected value: {}", expected);

    if !cli.quiet {
        eprintln!("simulating {} trials", config.iterations);
    }
    let mut rng = config.rng();
    let summary = simulate(&births, config.iterations, &mut rng)?;
    let (low, high) = summary.confidence_interval(0.95)?;
    println!("simulated average: {}", summary.mean);
    println!("95% confidence interval: {:.3} to {:.3}", low, high);
    Ok(())
}
