//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod command_usage;
pub mod competition;
pub mod lottery;
pub mod lottery_entry;
pub mod member;

// Re-export specific types to avoid conflicts
pub use command_usage::{
    Column as CommandUsageColumn, Entity as CommandUsage, Model as CommandUsageModel,
};
pub use competition::{
    Column as CompetitionColumn, CompetitionType, Entity as Competition,
    Model as CompetitionModel,
};
pub use lottery::{Column as LotteryColumn, Entity as Lottery, Model as LotteryModel};
pub use lottery_entry::{
    Column as LotteryEntryColumn, Entity as LotteryEntry, Model as LotteryEntryModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel, RsnList};
