//! Year filter predicate.
//!
//! Every panel of the dashboard starts with a filter transform derived from
//! the year selector. The predicate is a Vega expression string:
//!
//! ```
//! use permitlens_core::filter::year_filter_expr;
//!
//! assert_eq!(year_filter_expr(Some("2019")), "year(datum.ISSUE_DATE) == 2019");
//! assert_eq!(year_filter_expr(Some("all")), "true");
//! assert_eq!(year_filter_expr(None::<&str>), "true");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector value meaning "do not filter by year".
pub const ALL_YEARS: &str = "all";

/// Record field holding the permit issue timestamp.
pub const ISSUE_DATE_FIELD: &str = "ISSUE_DATE";

/// Predicate that keeps every record.
pub const MATCH_ALL: &str = "true";

/// The year selector's current value.
///
/// `Year` holds the raw selector text. It is interpolated verbatim into the
/// predicate, so a malformed value surfaces as an engine error at render
/// time. Use [`YearSelection::parse_strict`] at input boundaries that want
/// to reject such values early.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum YearSelection {
    /// No year filter.
    #[default]
    All,
    /// Keep records issued in this year.
    Year(String),
}

impl YearSelection {
    /// Interpret a raw selector value.
    ///
    /// Empty, absent, and `"all"` map to [`YearSelection::All`]; anything
    /// else is taken as a year without further checks.
    pub fn from_input(input: Option<&str>) -> Self {
        match input {
            None => Self::All,
            Some(s) if s.is_empty() || s == ALL_YEARS => Self::All,
            Some(s) => Self::Year(s.to_string()),
        }
    }

    /// Parse a selector value, rejecting anything that is not `"all"`,
    /// empty, or a 4-digit year.
    pub fn parse_strict(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_YEARS) {
            return Ok(Self::All);
        }
        if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Self::Year(trimmed.to_string()));
        }
        Err(Error::validation_field(
            "year",
            format!("expected 'all' or a 4-digit year, got '{input}'"),
        ))
    }

    /// Build the Vega filter expression for this selection.
    pub fn predicate(&self) -> String {
        match self {
            Self::All => MATCH_ALL.to_string(),
            Self::Year(year) => format!("year(datum.{ISSUE_DATE_FIELD}) == {year}"),
        }
    }

    /// The value the selector control shows for this selection.
    pub fn selector_value(&self) -> &str {
        match self {
            Self::All => ALL_YEARS,
            Self::Year(year) => year,
        }
    }

    /// Returns `true` if no year filtering applies.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<i32> for YearSelection {
    fn from(year: i32) -> Self {
        Self::Year(year.to_string())
    }
}

impl From<&str> for YearSelection {
    fn from(value: &str) -> Self {
        Self::from_input(Some(value))
    }
}

impl From<String> for YearSelection {
    fn from(value: String) -> Self {
        Self::from_input(Some(&value))
    }
}

impl From<YearSelection> for String {
    fn from(selection: YearSelection) -> Self {
        selection.selector_value().to_string()
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector_value())
    }
}

/// Build the year filter predicate from a raw selector value.
pub fn year_filter_expr<S: AsRef<str>>(year: Option<S>) -> String {
    YearSelection::from_input(year.as_ref().map(AsRef::as_ref)).predicate()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_variants_match_everything() {
        assert_eq!(year_filter_expr(None::<&str>), "true");
        assert_eq!(year_filter_expr(Some("")), "true");
        assert_eq!(year_filter_expr(Some("all")), "true");
    }

    #[test]
    fn test_year_string() {
        assert_eq!(
            year_filter_expr(Some("2019")),
            "year(datum.ISSUE_DATE) == 2019"
        );
    }

    #[test]
    fn test_year_number() {
        assert_eq!(
            YearSelection::from(2020).predicate(),
            "year(datum.ISSUE_DATE) == 2020"
        );
    }

    #[test]
    fn test_malformed_input_is_interpolated_verbatim() {
        assert_eq!(
            year_filter_expr(Some("abc")),
            "year(datum.ISSUE_DATE) == abc"
        );
    }

    #[test]
    fn test_sentinel_is_case_sensitive_in_lenient_mode() {
        assert_eq!(
            YearSelection::from("ALL"),
            YearSelection::Year("ALL".to_string())
        );
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(YearSelection::parse_strict("all").unwrap(), YearSelection::All);
        assert_eq!(YearSelection::parse_strict("").unwrap(), YearSelection::All);
        assert_eq!(
            YearSelection::parse_strict(" 2021 ").unwrap(),
            YearSelection::Year("2021".to_string())
        );
        assert!(YearSelection::parse_strict("21").is_err());
        assert!(YearSelection::parse_strict("20x1").is_err());

        let err = YearSelection::parse_strict("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_selector_value_and_display() {
        assert_eq!(YearSelection::All.selector_value(), "all");
        assert_eq!(YearSelection::from(2018).to_string(), "2018");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&YearSelection::from(2022)).unwrap();
        assert_eq!(json, "\"2022\"");
        let parsed: YearSelection = serde_json::from_str("\"all\"").unwrap();
        assert!(parsed.is_all());
    }

    proptest! {
        #[test]
        fn test_numeric_year_predicate(year in 1000i32..=9999) {
            let predicate = YearSelection::from(year).predicate();
            prop_assert_eq!(predicate, format!("year(datum.ISSUE_DATE) == {year}"));
        }

        #[test]
        fn test_distinct_years_give_distinct_predicates(a in 1000i32..=9999, b in 1000i32..=9999) {
            prop_assume!(a != b);
            prop_assert_ne!(
                YearSelection::from(a).predicate(),
                YearSelection::from(b).predicate()
            );
        }

        #[test]
        fn test_strict_accepts_every_four_digit_year(year in 1000u32..=9999) {
            let parsed = YearSelection::parse_strict(&year.to_string()).unwrap();
            prop_assert_eq!(parsed, YearSelection::Year(year.to_string()));
        }
    }
}
