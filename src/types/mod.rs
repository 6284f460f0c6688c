//! Data shapes mirrored from the oncall API
//!
//! Every field defaults when absent or `null` so partial payloads still decode.

use serde::{Deserialize, Deserializer};

pub mod roster;
pub mod schedule;
pub mod team;
pub mod user;

pub use roster::{Roster, RosterUser};
pub use schedule::{Schedule, ScheduleEvent};
pub use team::{Team, TeamConfig};
pub use user::{Contacts, User};

/// Decode an explicit `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
