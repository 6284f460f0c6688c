use serde::{Deserialize, Serialize};

use super::schedule::Schedule;

/// Roster membership entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterUser {
    #[serde(deserialize_with = "super::null_as_default")]
    pub in_rotation: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
}

/// Named subgroup of a team taking part in rotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub schedules: Vec<Schedule>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub users: Vec<RosterUser>,
}

impl Roster {
    pub fn new(name: impl Into<String>) -> Self {
        Roster {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Names of members currently in rotation
    pub fn users_in_rotation(&self) -> impl Iterator<Item = &str> {
        self.users
            .iter()
            .filter(|u| u.in_rotation)
            .map(|u| u.name.as_str())
    }
}
