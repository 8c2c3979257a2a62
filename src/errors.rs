//! Unified error type for the bot.
//!
//! Domain failures carry the user-facing message in their `Display` output so
//! command handlers can forward them verbatim. Backend failures wrap the
//! underlying library error.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// User input failed validation; the message is shown to the caller as-is
    #[error("{message}")]
    Validation {
        /// User-facing explanation
        message: String,
    },

    /// No member matched the given RSN
    #[error("No members found with rsn of {rsn}")]
    MemberNotFound {
        /// RSN that was looked up
        rsn: String,
    },

    /// A member with the same RSN or Discord account is already registered
    #[error("{rsn} already exists. Please use update command.")]
    DuplicateMember {
        /// RSN of the conflicting member
        rsn: String,
    },

    /// Competition id does not exist
    #[error("Competition with ID {id} not found.")]
    CompetitionNotFound {
        /// Competition id
        id: i64,
    },

    /// Lottery id does not exist
    #[error("Lottery with ID {id} not found.")]
    LotteryNotFound {
        /// Lottery id
        id: i64,
    },

    /// Lottery state does not allow the requested action
    #[error("{message}")]
    Lottery {
        /// User-facing explanation
        message: String,
    },

    /// Buying more lottery entries would exceed the per-member cap
    #[error(
        "Cannot add {requested} entries: that would make {} of a maximum {max}.",
        .current + .requested
    )]
    EntryCapExceeded {
        /// Entries already held
        current: i32,
        /// Entries requested
        requested: i32,
        /// Lottery cap
        max: i32,
    },

    /// Field key is not in the update allowlist or is not a member column
    #[error("Key {key} cannot be updated.")]
    UnknownField {
        /// Offending key
        key: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external API answered with an error
    #[error("{service} error: {message}")]
    ExternalApi {
        /// Name of the remote service
        service: &'static str,
        /// Error reported by the service
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting error while building a message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input or the state they asked
    /// about, whose message is shown to them verbatim.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::MemberNotFound { .. }
                | Self::DuplicateMember { .. }
                | Self::CompetitionNotFound { .. }
                | Self::LotteryNotFound { .. }
                | Self::Lottery { .. }
                | Self::EntryCapExceeded { .. }
                | Self::UnknownField { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
