//! Fiscal periods and their DART report codes.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fiscal quarter of a filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
    /// First quarter report.
    Q1,
    /// Half-year report.
    Q2,
    /// Third quarter report.
    Q3,
    /// Annual business report.
    Q4,
}

impl Quarter {
    /// All quarters in order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// Quarter number (1-4).
    pub const fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }
}

impl TryFrom<u8> for Quarter {
    type Error = DataError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Q1),
            2 => Ok(Self::Q2),
            3 => Ok(Self::Q3),
            4 => Ok(Self::Q4),
            other => Err(DataError::UnsupportedQuarter(other)),
        }
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.number()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// Fiscal year and quarter of a filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Business year (e.g. 2022).
    pub year: i32,
    /// Quarter within the business year.
    pub quarter: Quarter,
}

impl FiscalPeriod {
    /// Create a fiscal period, rejecting quarters outside 1..=4.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        Ok(Self {
            year,
            quarter: Quarter::try_from(quarter)?,
        })
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.year, self.quarter)
    }
}

/// Mapping from quarter to the DART `reprt_code` parameter.
///
/// Keys are quarter numbers so the mapping can be read straight from a
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportCodes(BTreeMap<u8, String>);

impl ReportCodes {
    /// Build a mapping from explicit pairs.
    pub fn new(codes: impl IntoIterator<Item = (u8, String)>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// Report code for a quarter.
    pub fn code_for(&self, quarter: Quarter) -> Result<&str> {
        self.0
            .get(&quarter.number())
            .map(String::as_str)
            .ok_or(DataError::UnsupportedQuarter(quarter.number()))
    }

    /// Quarters without a configured report code.
    pub fn missing_quarters(&self) -> Vec<Quarter> {
        Quarter::ALL
            .into_iter()
            .filter(|q| !self.0.contains_key(&q.number()))
            .collect()
    }
}

impl Default for ReportCodes {
    fn default() -> Self {
        Self::new([
            (1, "11013".to_string()),
            (2, "11012".to_string()),
            (3, "11014".to_string()),
            (4, "11011".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Quarter::Q1, "11013")]
    #[case(Quarter::Q2, "11012")]
    #[case(Quarter::Q3, "11014")]
    #[case(Quarter::Q4, "11011")]
    fn test_default_report_codes(#[case] quarter: Quarter, #[case] expected: &str) {
        assert_eq!(ReportCodes::default().code_for(quarter).unwrap(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    fn test_quarter_out_of_range(#[case] value: u8) {
        assert!(matches!(
            FiscalPeriod::new(2022, value),
            Err(DataError::UnsupportedQuarter(v)) if v == value
        ));
    }

    #[test]
    fn test_missing_report_code() {
        let codes = ReportCodes::new([(1, "11013".to_string())]);
        assert!(codes.code_for(Quarter::Q1).is_ok());
        assert!(matches!(
            codes.code_for(Quarter::Q3),
            Err(DataError::UnsupportedQuarter(3))
        ));
        assert_eq!(
            codes.missing_quarters(),
            vec![Quarter::Q2, Quarter::Q3, Quarter::Q4]
        );
    }

    #[test]
    fn test_period_display() {
        let period = FiscalPeriod::new(2022, 1).unwrap();
        assert_eq!(period.to_string(), "2022Q1");
    }
}
