use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const MIN_RACE_NUMBER: u8 = 1;
pub const MAX_RACE_NUMBER: u8 = 12;

/// Which race a ranking belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceContext {
    pub date: NaiveDate,
    pub venue: String,
    pub race: u8,
}

impl RaceContext {
    /// Check the race number and that the venue is one the tool knows.
    pub fn validate(&self, venues: &[String]) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if !(MIN_RACE_NUMBER..=MAX_RACE_NUMBER).contains(&self.race) {
            errors.push(format!(
                "race: {} is outside {}-{}",
                self.race, MIN_RACE_NUMBER, MAX_RACE_NUMBER
            ));
        }
        if !venues.iter().any(|v| v == &self.venue) {
            errors.push(format!(
                "venue: '{}' is not one of {}",
                self.venue,
                venues.join(", ")
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Display for RaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}　{} {}R", self.date, self.venue, self.race)
    }
}
