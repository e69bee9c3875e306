mod engine;
mod error;
mod types;

pub use engine::{Applied, Engine, Intent, RenameTarget, Session};
pub use error::{CoreError, CoreErrorCode, Rejection};
pub use types::{
    BankEntryView, CreatureView, PlayerView, Snapshot, StorageBoxView, StorageEntryView,
    TeamMemberView,
};
