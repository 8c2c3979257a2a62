//! Discord command implementations organized by module.
//!
//! Each submodule's commands carry its name as their poise `category`, which
//! is what the `modules` setting switches on and off.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Roster administration commands
pub mod admin;

/// Skill and boss competition commands
pub mod competition;

/// Bot maintenance commands
pub mod dev;

/// Help
pub mod general;

/// Read-only roster lookups
pub mod lookup;

/// Lottery commands
pub mod lottery;

/// Self-service profile commands
pub mod profile;

// Export commands
pub use admin::*;
pub use competition::*;
pub use dev::*;
pub use general::*;
pub use lookup::*;
pub use lottery::*;
pub use profile::*;
