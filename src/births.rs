//! Birth counts per calendar date, aggregated from the FiveThirtyEight US
//! births datasets.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};

use serde::{Deserialize, Serialize};
use statrs::distribution::Geometric;
use statrs::statistics::Distribution;

use crate::calendar::MonthDay;
use crate::error::{Result, RiddlerError};

pub const CDC_1994_2003_URL: &str = "https://raw.githubusercontent.com/fivethirtyeight/data/master/births/US_births_1994-2003_CDC_NCHS.csv";
pub const SSA_2000_2014_URL: &str = "https://raw.githubusercontent.com/fivethirtyeight/data/master/births/US_births_2000-2014_SSA.csv";

/// Days in a four year cycle, one of which is February 29th.
pub const DAYS_PER_CYCLE: f64 = 365.0 * 4.0 + 1.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BirthRow {
    #[serde(default)]
    pub year: Option<u32>,
    pub month: u32,
    pub date_of_month: u32,
    pub births: u64,
}

impl BirthRow {
    pub fn date(&self) -> MonthDay {
        MonthDay::new(self.month, self.date_of_month)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub first: u32,
    pub last: u32,
}

impl YearRange {
    pub fn contains(&self, year: u32) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

/// Where to read one births CSV from, and which of its years to keep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// An `http(s)://` URL or a local file path.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<YearRange>,
}

impl SourceSpec {
    pub fn new(location: impl Into<String>, years: Option<YearRange>) -> Self {
        SourceSpec {
            location: location.into(),
            years,
        }
    }

    /// CDC data in full, plus the SSA years the CDC file does not cover.
    /// 2014 is left out of the SSA data along with the overlap.
    pub fn default_sources() -> Vec<SourceSpec> {
        vec![
            SourceSpec::new(CDC_1994_2003_URL, None),
            SourceSpec::new(
                SSA_2000_2014_URL,
                Some(YearRange {
                    first: 2004,
                    last: 2013,
                }),
            ),
        ]
    }

    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    pub fn accepts(&self, row: &BirthRow) -> bool {
        match (self.years, row.year) {
            (None, _) => true,
            (Some(range), Some(year)) => range.contains(year),
            (Some(_), None) => false,
        }
    }

    /// Opens the source for reading. Remote sources are fetched with a
    /// single blocking request.
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        if self.is_remote() {
            let response = ureq::get(&self.location).call()?;
            Ok(Box::new(response.into_reader()))
        } else {
            Ok(Box::new(BufReader::new(File::open(&self.location)?)))
        }
    }
}

/// Total births observed on each calendar date.
///
/// Dates with no recorded births are left out entirely, so every stored date
/// has a strictly positive probability.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BirthsByDate {
    counts: BTreeMap<MonthDay, u64>,
    total: u64,
}

impl BirthsByDate {
    /// Fetches and aggregates every source, in order.
    pub fn load(sources: &[SourceSpec]) -> Result<Self> {
        let mut births = BirthsByDate::default();
        for source in sources {
            let reader = source.open()?;
            births.accumulate(reader, source)?;
        }
        births.finish()
    }

    /// Like [`BirthsByDate::load`], but reads already opened CSV streams.
    pub fn from_readers<R, I>(sources: I) -> Result<Self>
    where
        R: Read,
        I: IntoIterator<Item = (R, SourceSpec)>,
    {
        let mut births = BirthsByDate::default();
        for (reader, source) in sources {
            births.accumulate(reader, &source)?;
        }
        births.finish()
    }

    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (MonthDay, u64)>,
    {
        let mut births = BirthsByDate::default();
        for (date, count) in counts {
            births.add(date, count);
        }
        births.finish()
    }

    fn add(&mut self, date: MonthDay, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(date).or_default() += count;
        self.total += count;
    }

    fn accumulate<R: Read>(&mut self, reader: R, source: &SourceSpec) -> Result<()> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        for row in csv.deserialize::<BirthRow>() {
            let row = row?;
            if source.accepts(&row) {
                self.add(row.date(), row.births);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Self> {
        if self.total == 0 {
            return Err(RiddlerError::EmptyDataset);
        }
        Ok(self)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct dates observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn births(&self, date: MonthDay) -> Option<u64> {
        self.counts.get(&date).copied()
    }

    /// Observed dates in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = MonthDay> + '_ {
        self.counts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthDay, u64)> + '_ {
        self.counts.iter().map(|(date, count)| (*date, *count))
    }

    /// Chance that a random person was born on `date`.
    pub fn probability(&self, date: MonthDay) -> Result<f64> {
        let count = self
            .births(date)
            .ok_or(RiddlerError::UnobservedDate(date))?;
        Ok(count as f64 / self.total as f64)
    }

    /// Expected number of people greeted before one is born on `date`,
    /// not counting the match: the mean failure count of a geometric
    /// distribution with success probability `probability(date)`.
    pub fn expected_trials(&self, date: MonthDay) -> Result<f64> {
        let geometric = Geometric::new(self.probability(date)?)?;
        // mean counts the matching greeting too
        geometric
            .mean()
            .map(|trials| trials - 1.0)
            .ok_or(RiddlerError::UndefinedExpectation(date))
    }

    /// Expected greetings before a match, averaged over which day today is.
    pub fn closed_form_expectation(&self) -> Result<f64> {
        let mut expectation = 0.0;
        for date in self.dates() {
            expectation += today_weight(date) * self.expected_trials(date)?;
        }
        Ok(expectation)
    }
}

/// Chance that today is `date`, over a four year cycle.
pub fn today_weight(date: MonthDay) -> f64 {
    if date.is_leap_day() {
        1.0 / DAYS_PER_CYCLE
    } else {
        4.0 / DAYS_PER_CYCLE
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CDC_SAMPLE: &str = "\
year,month,date_of_month,day_of_week,births
1994,1,1,6,8096
1994,1,2,7,7772
1996,2,29,4,11000
";

    const SSA_SAMPLE: &str = "\
year,month,date_of_month,day_of_week,births
2003,1,1,3,9000
2004,1,1,4,8000
2004,2,29,7,9500
2013,1,2,3,10000
2014,1,1,3,7000
";

    fn sample() -> BirthsByDate {
        BirthsByDate::from_readers(vec![
            (CDC_SAMPLE.as_bytes(), SourceSpec::new("cdc", None)),
            (
                SSA_SAMPLE.as_bytes(),
                SourceSpec::new(
                    "ssa",
                    Some(YearRange {
                        first: 2004,
                        last: 2013,
                    }),
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_year_filter() {
        let births = sample();
        assert_eq!(births.births(MonthDay::new(1, 1)), Some(8096 + 8000));
        assert_eq!(births.births(MonthDay::new(1, 2)), Some(7772 + 10000));
        assert_eq!(births.births(MonthDay::LEAP_DAY), Some(11000 + 9500));
        assert_eq!(births.len(), 3);
    }

    #[test]
    fn test_total_matches_counts() {
        let births = sample();
        let sum: u64 = births.iter().map(|(_, count)| count).sum();
        assert_eq!(births.total(), sum);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let births = sample();
        let sum: f64 = births
            .dates()
            .map(|date| births.probability(date).unwrap())
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
        for date in births.dates() {
            assert!(births.expected_trials(date).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_two_date_scenario() {
        let births = BirthsByDate::from_counts(vec![
            (MonthDay::new(1, 1), 100),
            (MonthDay::new(6, 15), 300),
        ])
        .unwrap();
        assert_eq!(births.total(), 400);
        assert_eq!(births.probability(MonthDay::new(1, 1)).unwrap(), 0.25);
        assert_eq!(births.probability(MonthDay::new(6, 15)).unwrap(), 0.75);
        assert_eq!(births.expected_trials(MonthDay::new(1, 1)).unwrap(), 3.0);
        let rare = births.expected_trials(MonthDay::new(6, 15)).unwrap();
        assert!((rare - 1.0 / 3.0).abs() < 1e-12);

        let expected = 4.0 / DAYS_PER_CYCLE * (3.0 + 1.0 / 3.0);
        assert!((births.closed_form_expectation().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_certain_date_has_no_failures() {
        let births = BirthsByDate::from_counts(vec![(MonthDay::new(2, 2), 7)]).unwrap();
        assert_eq!(births.probability(MonthDay::new(2, 2)).unwrap(), 1.0);
        assert_eq!(births.expected_trials(MonthDay::new(2, 2)).unwrap(), 0.0);
    }

    #[test]
    fn test_unobserved_date() {
        let births = BirthsByDate::from_counts(vec![(MonthDay::new(1, 1), 100)]).unwrap();
        match births.probability(MonthDay::new(7, 4)) {
            Err(RiddlerError::UnobservedDate(date)) => assert_eq!(date, MonthDay::new(7, 4)),
            other => panic!("expected UnobservedDate, got {:?}", other),
        }
        assert!(matches!(
            births.expected_trials(MonthDay::new(7, 4)),
            Err(RiddlerError::UnobservedDate(_))
        ));
    }

    #[test]
    fn test_zero_counts_are_unobserved() {
        let births = BirthsByDate::from_counts(vec![
            (MonthDay::new(1, 1), 100),
            (MonthDay::new(1, 2), 0),
        ])
        .unwrap();
        assert_eq!(births.len(), 1);
        assert!(births.probability(MonthDay::new(1, 2)).is_err());
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(
            BirthsByDate::from_counts(Vec::new()),
            Err(RiddlerError::EmptyDataset)
        ));
        let header_only = "year,month,date_of_month,day_of_week,births\n";
        assert!(matches!(
            BirthsByDate::from_readers(vec![(header_only.as_bytes(), SourceSpec::new("x", None))]),
            Err(RiddlerError::EmptyDataset)
        ));
    }

    #[test]
    fn test_malformed_csv() {
        let bad = "month,date_of_month,births\n1,1,lots\n";
        assert!(matches!(
            BirthsByDate::from_readers(vec![(bad.as_bytes(), SourceSpec::new("x", None))]),
            Err(RiddlerError::Csv(_))
        ));
    }

    #[test]
    fn test_rows_without_year() {
        let rows = "month,date_of_month,births\n3,14,500\n";
        let unfiltered =
            BirthsByDate::from_readers(vec![(rows.as_bytes(), SourceSpec::new("x", None))])
                .unwrap();
        assert_eq!(unfiltered.births(MonthDay::new(3, 14)), Some(500));

        let filtered = BirthsByDate::from_readers(vec![(
            rows.as_bytes(),
            SourceSpec::new(
                "x",
                Some(YearRange {
                    first: 2004,
                    last: 2013,
                }),
            ),
        )]);
        assert!(matches!(filtered, Err(RiddlerError::EmptyDataset)));
    }

    #[test]
    fn test_today_weights_cover_cycle() {
        let sum: f64 = crate::calendar::DaysInMonth::standard()
            .iter()
            .chain(std::iter::once(MonthDay::LEAP_DAY))
            .map(today_weight)
            .sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_remote_detection() {
        assert!(SourceSpec::new(CDC_1994_2003_URL, None).is_remote());
        assert!(!SourceSpec::new("data/births.csv", None).is_remote());
    }
}
