use crate::calendar::MonthDay;

#[derive(Debug, thiserror::Error)]
pub enum RiddlerError {
    /// Gap analysis needs at least one year that no (month, day) pair reaches.
    #[error("expected at least one year with zero occurrences, but the fewest was {min}")]
    NoUnreachableYear { min: u32 },

    #[error("no (month, day) pair multiplies to year {year}")]
    NoOccurrence { year: u32 },

    #[error("a gap needs at least one year")]
    EmptyRun,

    /// Gap runs are made of two-digit years 1 through 99.
    #[error("year {year} is outside 1..=99")]
    YearOutOfRange { year: u32 },

    #[error("no births were recorded on {0}")]
    UnobservedDate(MonthDay),

    #[error("no finite expectation for {0}")]
    UndefinedExpectation(MonthDay),

    #[error("dataset contains no births")]
    EmptyDataset,

    #[error("simulation needs at least one iteration")]
    NoIterations,

    #[error(transparent)]
    Http(#[from] Box<ureq::Error>),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    ConfigWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Stats(#[from] statrs::StatsError),
}

impl From<ureq::Error> for RiddlerError {
    fn from(e: ureq::Error) -> Self {
        RiddlerError::Http(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, RiddlerError>;
