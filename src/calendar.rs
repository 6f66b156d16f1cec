//! Relative-day labels and their calendar rules.
//!
//! Every label maps to a small rule record in [`RULES`]. Adding a label is a
//! data change: a new [`Label`] variant plus one table row.
//!
//! ```text
//! label         rule                                   example (ref = Sun 2021-11-28)
//! ─────────────────────────────────────────────────────────────────────────────────
//! daybooks      root anchor, no date                   -
//! yesterday     ref - 1                                2021-11-27
//! today         ref                                    2021-11-28
//! tomorrow      ref + 1                                2021-11-29
//! next-monday   ref + 7 - (dow - 1)                    2021-11-29
//! this-weekend  Sat: +0, Sun: +1, else +7 - (dow - 6)  2021-11-29
//! next-weekend  weekend only: ref + 7 - (dow - 7)      2021-12-05
//! last-friday   ref - ((dow - 5) mod 7)                2021-11-26
//! ```

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// ISO day-of-week numbers (Monday = 1 ... Sunday = 7).
const MONDAY: i64 = 1;
const FRIDAY: i64 = 5;
const SATURDAY: i64 = 6;
const SUNDAY: i64 = 7;

/// Lookup key format, matching daybook page titles.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Reference Instant
// ============================================================================

/// The point in time all labels of one run are resolved against.
///
/// Already anchored to the intended local calendar: no time-zone conversion
/// happens after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceInstant {
    at: NaiveDateTime,
}

impl ReferenceInstant {
    pub const fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Midnight of the given civil date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN))
    }

    /// Current local wall-clock time.
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    pub const fn datetime(&self) -> NaiveDateTime {
        self.at
    }

    /// ISO day of week, 1 = Monday ... 7 = Sunday.
    pub fn iso_weekday(&self) -> i64 {
        i64::from(self.at.weekday().number_from_monday())
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.iso_weekday(), SATURDAY | SUNDAY)
    }

    fn offset(&self, days: i64) -> NaiveDate {
        self.date() + Duration::days(days)
    }
}

impl fmt::Display for ReferenceInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%Y-%m-%d %H:%M:%S"))
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Fixed set of page labels, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Daybooks,
    Yesterday,
    Today,
    Tomorrow,
    NextMonday,
    ThisWeekend,
    NextWeekend,
    LastFriday,
}

impl Label {
    /// Generation order used by the site builder.
    pub const ALL: [Label; 8] = [
        Label::Daybooks,
        Label::Yesterday,
        Label::Today,
        Label::Tomorrow,
        Label::NextMonday,
        Label::ThisWeekend,
        Label::NextWeekend,
        Label::LastFriday,
    ];

    pub fn as_str(self) -> &'static str {
        self.rule().name
    }

    /// Whether the label also gets a `<label>-mobile.html` deep-link page.
    pub fn has_mobile_variant(self) -> bool {
        self.rule().mobile
    }

    /// Apply this label's rule to the reference instant.
    pub fn resolve(self, reference: &ReferenceInstant) -> Target {
        (self.rule().resolve)(reference)
    }

    fn rule(self) -> &'static Rule {
        &RULES[self as usize]
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a label points at for a given reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Daybook page titled with this date.
    Date(NaiveDate),
    /// The root "day books" anchor document.
    Root,
    /// Label does not apply for this reference (not an error).
    Skip,
}

impl Target {
    #[cfg(test)]
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Target::Date(date) => Some(date),
            _ => None,
        }
    }
}

/// Render a date as the lookup key (`yyyy-MM-dd`).
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

// ============================================================================
// Rule Table
// ============================================================================

struct Rule {
    name: &'static str,
    mobile: bool,
    resolve: fn(&ReferenceInstant) -> Target,
}

/// Indexed by `Label as usize`; keep in declaration order.
static RULES: [Rule; 8] = [
    Rule { name: "daybooks", mobile: false, resolve: root },
    Rule { name: "yesterday", mobile: false, resolve: yesterday },
    Rule { name: "today", mobile: true, resolve: today },
    Rule { name: "tomorrow", mobile: false, resolve: tomorrow },
    Rule { name: "next-monday", mobile: false, resolve: next_monday },
    Rule { name: "this-weekend", mobile: false, resolve: this_weekend },
    Rule { name: "next-weekend", mobile: false, resolve: next_weekend },
    Rule { name: "last-friday", mobile: false, resolve: last_friday },
];

fn root(_: &ReferenceInstant) -> Target {
    Target::Root
}

fn yesterday(r: &ReferenceInstant) -> Target {
    Target::Date(r.offset(-1))
}

fn today(r: &ReferenceInstant) -> Target {
    Target::Date(r.offset(0))
}

fn tomorrow(r: &ReferenceInstant) -> Target {
    Target::Date(r.offset(1))
}

/// Always strictly forward: a Monday reference yields the following Monday.
fn next_monday(r: &ReferenceInstant) -> Target {
    Target::Date(r.offset(7 - (r.iso_weekday() - MONDAY)))
}

/// Sunday rolls forward by one day rather than staying on the current Sunday.
/// Kept as-is until the product owner confirms the intended Sunday target.
fn this_weekend(r: &ReferenceInstant) -> Target {
    let days = match r.iso_weekday() {
        SATURDAY => 0,
        SUNDAY => 1,
        dow => 7 - (dow - SATURDAY),
    };
    Target::Date(r.offset(days))
}

/// Only defined on a weekend; lands on the Sunday of the following weekend.
fn next_weekend(r: &ReferenceInstant) -> Target {
    if !r.is_weekend() {
        return Target::Skip;
    }
    Target::Date(r.offset(7 - (r.iso_weekday() - SUNDAY)))
}

/// Most recent Friday on or before the reference.
fn last_friday(r: &ReferenceInstant) -> Target {
    let back = (r.iso_weekday() - FRIDAY).rem_euclid(7);
    Target::Date(r.offset(-back))
}

// ============================================================================
// Tests
// ============================================================================
