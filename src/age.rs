//! Age classification
//!
//! Maps a photo's capture date and a reference birth date to a folder label
//! such as `newborn`, `3rd_month` or `1st_year_2nd_month`. Only the calendar
//! year and month take part in the computation; the day of month is ignored,
//! so every photo from the same calendar month lands in the same bucket.

use chrono::Datelike;
use std::fmt;

/// Label for photos taken before the reference date
pub const BEFORE_BIRTH: &str = "before_birth";

/// Label for photos taken in the birth month
pub const NEWBORN: &str = "newborn";

/// Folder label derived from elapsed calendar months
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgeLabel(String);

impl AgeLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AgeLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for AgeLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Calendar months between the birth month and the capture month
///
/// Negative when the photo predates the birth month.
pub fn months_elapsed<C: Datelike, B: Datelike>(captured_at: &C, birth_date: &B) -> i64 {
    let years = i64::from(captured_at.year()) - i64::from(birth_date.year());
    let months = i64::from(captured_at.month()) - i64::from(birth_date.month());
    years * 12 + months
}

/// Classify a photo by the subject's age when it was taken
pub fn classify<C: Datelike, B: Datelike>(captured_at: &C, birth_date: &B) -> AgeLabel {
    label_for_months(months_elapsed(captured_at, birth_date))
}

/// Build the label for a number of elapsed months
///
/// Total over every input; negative values collapse to `before_birth`.
pub fn label_for_months(months_elapsed: i64) -> AgeLabel {
    let label = match months_elapsed {
        m if m < 0 => BEFORE_BIRTH.to_string(),
        0 => NEWBORN.to_string(),
        1..=11 => month_part(months_elapsed),
        _ => {
            let years = months_elapsed / 12;
            let months = months_elapsed % 12;
            if months == 0 {
                format!("{}_year", ordinal(years))
            } else {
                format!("{}_year_{}", ordinal(years), month_part(months))
            }
        }
    };
    AgeLabel(label)
}

/// `1st`, `2nd`, `3rd`, then `{n}th` for everything else
pub fn ordinal(n: i64) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{}th", n),
    }
}

fn month_part(months: i64) -> String {
    format!("{}_month", ordinal(months))
}
