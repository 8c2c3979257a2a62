//! Membership-level progression.
//!
//! Members become eligible for the next rank after fixed numbers of days since
//! they joined. These functions are pure; the caller passes `today` so results
//! do not depend on the wall clock.
//!
//! Levels 0 to 3 are progressed by join date alone. The 365-day threshold
//! marks when a level 3 member may be promoted to level 4, which is an admin
//! decision, so [`expected_mem_lvl_by_join_date`] never reports more than 3.

use chrono::{NaiveDate, NaiveDateTime};

/// Days since joining at which each successive rank becomes available.
pub const PROMOTION_THRESHOLDS: [i64; 4] = [14, 84, 182, 365];

/// First level that is no longer progressed automatically.
pub const AUTO_PROMOTION_CAP: i32 = 4;

const JOIN_DATE_FMT: &str = "%Y-%m-%d";

/// A join date as it may arrive from storage or user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDate<'a> {
    /// Text in `YYYY-MM-DD` form
    Text(&'a str),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp, truncated to its date
    DateTime(NaiveDateTime),
    /// Anything else; never yields a date
    Unsupported,
}

impl JoinDate<'_> {
    /// The calendar date, or `None` if the value cannot be interpreted.
    #[must_use]
    pub fn to_date(self) -> Option<NaiveDate> {
        match self {
            Self::Text(text) => NaiveDate::parse_from_str(text.trim(), JOIN_DATE_FMT).ok(),
            Self::Date(date) => Some(date),
            Self::DateTime(datetime) => Some(datetime.date()),
            Self::Unsupported => None,
        }
    }
}

impl From<NaiveDate> for JoinDate<'_> {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for JoinDate<'_> {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<'a> From<&'a str> for JoinDate<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a, T: Into<JoinDate<'a>>> From<Option<T>> for JoinDate<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unsupported, Into::into)
    }
}

/// Date on which the member becomes eligible for their next rank.
///
/// Returns `None` once `level` reaches [`AUTO_PROMOTION_CAP`], when the
/// member has passed every threshold, or when the join date is unusable.
/// Only the cap depends on `level`; the date itself is the first threshold
/// the member has not yet reached, so a level 3 member gets the 365-day date.
#[must_use]
pub fn next_mem_lvl_date<'a>(
    level: i32,
    join_date: impl Into<JoinDate<'a>>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if level >= AUTO_PROMOTION_CAP {
        return None;
    }
    let joined = join_date.into().to_date()?;
    let days = (today - joined).num_days();

    PROMOTION_THRESHOLDS
        .iter()
        .find(|&&threshold| threshold > days)
        .map(|&threshold| joined + chrono::Duration::days(threshold))
}

/// Level a member should hold based on time since joining alone.
#[must_use]
pub fn expected_mem_lvl_by_join_date(join_date: NaiveDate, today: NaiveDate) -> i32 {
    match (today - join_date).num_days() {
        days if days < PROMOTION_THRESHOLDS[0] => 0,
        days if days < PROMOTION_THRESHOLDS[1] => 1,
        days if days < PROMOTION_THRESHOLDS[2] => 2,
        _ => 3,
    }
}

/// Name of the rank after `level`, or `None` at or beyond the cap.
#[must_use]
pub fn next_mem_lvl(level: i32, names: &[String]) -> Option<&str> {
    if !(0..AUTO_PROMOTION_CAP).contains(&level) {
        return None;
    }
    usize::try_from(level + 1)
        .ok()
        .and_then(|i| names.get(i))
        .map(String::as_str)
}

/// What a member can expect from their next promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutlook {
    /// Time served already qualifies them for `rank`
    AlreadyEligible {
        /// Next rank name
        rank: String,
    },
    /// They qualify for `rank` on `date`
    EligibleOn {
        /// Next rank name
        rank: String,
        /// First eligible day
        date: NaiveDate,
    },
    /// No further automatic promotions
    AllRanks,
    /// Join date is not recorded
    NoJoinDate,
}

/// Combines the calculator functions into a single answer for `/promotion-when`.
#[must_use]
pub fn promotion_outlook(
    level: i32,
    join_date: Option<NaiveDate>,
    names: &[String],
    today: NaiveDate,
) -> PromotionOutlook {
    let Some(rank) = next_mem_lvl(level, names) else {
        return PromotionOutlook::AllRanks;
    };
    let Some(joined) = join_date else {
        return PromotionOutlook::NoJoinDate;
    };

    if expected_mem_lvl_by_join_date(joined, today) > level {
        return PromotionOutlook::AlreadyEligible {
            rank: rank.to_string(),
        };
    }

    next_mem_lvl_date(level, joined, today).map_or(PromotionOutlook::AllRanks, |date| {
        PromotionOutlook::EligibleOn {
            rank: rank.to_string(),
            date,
        }
    })
}
