pub mod births;
pub mod calendar;
pub mod collisions;
pub mod config;
pub mod error;
pub mod simulate;

pub use births::{BirthRow, BirthsByDate, SourceSpec, YearRange};
pub use calendar::*;
pub use collisions::*;
pub use config::Config;
pub use error::{Result, RiddlerError};
pub use simulate::*;
