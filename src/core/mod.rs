//! Core business logic, independent of Discord.
//!
//! Functions here take a database connection and plain values and return
//! domain results. Anything clock- or randomness-dependent takes `now`,
//! `today`, or an RNG as a parameter.

/// Application message parsing
pub mod application;
/// Skill and boss competitions
pub mod competition;
/// Money, tables, and message pagination
pub mod format;
/// Roster import from the spreadsheet
pub mod import;
/// Lottery draws and entries
pub mod lottery;
/// Member registration, lookup, and updates
pub mod member;
/// Membership-level promotion calculator
pub mod membership;
/// Command audit log
pub mod usage;
