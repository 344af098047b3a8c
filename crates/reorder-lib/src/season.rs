//! Season taxonomy and month-based classification

use crate::error::ReportError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed calendar buckets a record can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Monsoon,
    Autumn,
    Winter,
}

impl Season {
    /// All four labels, in the order the fitted vocabulary lists them
    pub const ALL: [Season; 4] = [
        Season::Summer,
        Season::Monsoon,
        Season::Autumn,
        Season::Winter,
    ];

    /// Classify a calendar date into its season.
    ///
    /// Only the month component is examined. The mapping is fixed:
    /// 3-5 Summer, 6-9 Monsoon, 10-11 Autumn, everything else Winter.
    pub fn classify(date: NaiveDate) -> Season {
        Season::from_month(date.month())
    }

    /// Total over every month value; 1, 2 and 12 land in Winter
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Summer,
            6..=9 => Season::Monsoon,
            10 | 11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ReportError;

    /// Case-sensitive, no normalization: the request interface accepts
    /// exactly the four canonical labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Summer" => Ok(Season::Summer),
            "Monsoon" => Ok(Season::Monsoon),
            "Autumn" => Ok(Season::Autumn),
            "Winter" => Ok(Season::Winter),
            other => Err(ReportError::InvalidSeason(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_exhaustive_over_months() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Summer),
            (4, Season::Summer),
            (5, Season::Summer),
            (6, Season::Monsoon),
            (7, Season::Monsoon),
            (8, Season::Monsoon),
            (9, Season::Monsoon),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), season, "month {month}");
            let date = NaiveDate::from_ymd_opt(2023, month, 15).unwrap();
            assert_eq!(Season::classify(date), season, "date {date}");
        }
    }

    #[test]
    fn parses_exact_labels_only() {
        assert_eq!("Summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("Monsoon".parse::<Season>().unwrap(), Season::Monsoon);
        assert_eq!("Autumn".parse::<Season>().unwrap(), Season::Autumn);
        assert_eq!("Winter".parse::<Season>().unwrap(), Season::Winter);

        for bad in ["Spring", "", "summer", "SUMMER", " Winter"] {
            let err = bad.parse::<Season>().unwrap_err();
            assert!(matches!(err, ReportError::InvalidSeason(_)), "{bad}");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for season in Season::ALL {
            assert_eq!(season.to_string().parse::<Season>().unwrap(), season);
        }
    }
}
