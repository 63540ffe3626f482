//! Monte Carlo estimate of the unbirthday expectation.

use rand::seq::SliceRandom;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::births::BirthsByDate;
use crate::calendar::MonthDay;
use crate::error::{Result, RiddlerError};

/// Chance a drawn February 29th is thrown back. Three out of four years
/// have no leap day.
pub const LEAP_DAY_REJECTION: f64 = 0.75;

/// Draws "today" uniformly from `dates`. A February 29th is thrown back with
/// probability [`LEAP_DAY_REJECTION`] and replaced by a single fresh draw,
/// which is kept whatever it is.
pub fn sample_date<R: Rng + ?Sized>(dates: &[MonthDay], rng: &mut R) -> Option<MonthDay> {
    let date = *dates.choose(rng)?;
    if date.is_leap_day() && rng.gen::<f64>() < LEAP_DAY_REJECTION {
        return dates.choose(rng).copied();
    }
    Some(date)
}

/// Greets random people until one matches, returning how many did not.
/// `probability` must be positive.
pub fn greet_until_match<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> u64 {
    let mut greeted = 0;
    while rng.gen::<f64>() > probability {
        greeted += 1;
    }
    greeted
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationSummary {
    pub iterations: usize,
    pub mean: f64,
    pub std_error: f64,
}

impl SimulationSummary {
    /// Normal approximation interval around the mean, e.g. `level = 0.95`.
    pub fn confidence_interval(&self, level: f64) -> Result<(f64, f64)> {
        let z = Normal::new(0.0, 1.0)?.inverse_cdf(0.5 + level / 2.0);
        Ok((self.mean - z * self.std_error, self.mean + z * self.std_error))
    }
}

pub fn simulate<R: Rng + ?Sized>(
    births: &BirthsByDate,
    iterations: usize,
    rng: &mut R,
) -> Result<SimulationSummary> {
    if iterations == 0 {
        return Err(RiddlerError::NoIterations);
    }
    let dates: Vec<MonthDay> = births.dates().collect();

    let mut sum = 0.0;
    let mut sos = 0.0;
    for _ in 0..iterations {
        let date = sample_date(&dates, rng).ok_or(RiddlerError::EmptyDataset)?;
        let greeted = greet_until_match(births.probability(date)?, rng) as f64;
        sum += greeted;
        sos += greeted * greeted;
    }

    let n = iterations as f64;
    let mean = sum / n;
    let variance = if iterations > 1 {
        ((sos / n - mean * mean) * n / (n - 1.0)).max(0.0)
    } else {
        0.0
    };
    Ok(SimulationSummary {
        iterations,
        mean,
        std_error: (variance / n).sqrt(),
    })
}
