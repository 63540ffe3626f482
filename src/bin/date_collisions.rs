use anyhow::Context;
use clap::Parser;

use riddler::{compute_occurrences, find_longest_gap, format_years, summarize, DaysInMonth};

/// Counts the dates M/D/20YY where M * D == YY, and the longest stretch without one.
#[derive(Parser)]
#[command(name = "date_collisions")]
struct Cli {
    /// Also print the number of occurrences in every year
    #[arg(long)]
    table: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let table = DaysInMonth::standard();

    let years = compute_occurrences(&table);
    if cli.table {
        for (i, count) in years.iter().enumerate() {
            println!("20{:02}: {}", i + 1, count);
        }
    }

    let summary =
        summarize(&years).context("occurrence counts leave no empty year to measure gaps between")?;
    println!("Total number of occurrences: {}", summary.total);
    println!(
        "Years with most occurrences ({}): {}",
        summary.max,
        format_years(&summary.max_years)
    );
    println!(
        "Years with fewest occurrences ({}): {}",
        summary.min,
        format_years(&summary.min_years)
    );

    match find_longest_gap(&summary.min_years, &table)? {
        Some(gap) => println!("{}", gap),
        None => println!("Every year has an occurrence."),
    }
    Ok(())
}
