//! Team types
//!
//! A team is keyed by its name everywhere in the API; the numeric id is
//! informational. Renaming goes through an explicit update call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::roster::Roster;
use super::user::User;

/// The writable part of a team, as sent on create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,
    /// Escalation plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iris_plan: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub scheduling_timezone: String,
}

impl TeamConfig {
    /// Create a team config with the two fields the API requires
    pub fn new(name: impl Into<String>, scheduling_timezone: impl Into<String>) -> Self {
        TeamConfig {
            name: name.into(),
            scheduling_timezone: scheduling_timezone.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_slack_channel(mut self, channel: impl Into<String>) -> Self {
        self.slack_channel = Some(channel.into());
        self
    }

    pub fn with_iris_plan(mut self, plan: impl Into<String>) -> Self {
        self.iris_plan = Some(plan.into());
        self
    }
}

/// A team with its associated collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    #[serde(flatten)]
    pub config: TeamConfig,
    #[serde(deserialize_with = "super::null_as_default")]
    pub admins: Vec<User>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: i64,
    /// Keyed by roster name
    #[serde(deserialize_with = "super::null_as_default")]
    pub rosters: HashMap<String, Roster>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub services: Vec<String>,
    /// Keyed by username
    #[serde(deserialize_with = "super::null_as_default")]
    pub users: HashMap<String, User>,
}

impl Team {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Copy each roster's map key into its `name` field; the API omits it
    pub(crate) fn fill_roster_names(&mut self) {
        for (name, roster) in self.rosters.iter_mut() {
            roster.name = name.clone();
        }
    }
}
