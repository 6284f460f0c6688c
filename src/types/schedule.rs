use serde::{Deserialize, Serialize};

/// A concrete shift slot: unix start plus duration in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleEvent {
    #[serde(deserialize_with = "super::null_as_default")]
    pub duration: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub start: i64,
}

/// Rotation policy for one role within a roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    /// 1 for advanced mode, 0 for simple mode
    #[serde(deserialize_with = "super::null_as_default")]
    pub advanced_mode: i32,
    /// Days ahead the scheduler populates
    #[serde(deserialize_with = "super::null_as_default")]
    pub auto_populate_threshold: i32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub events: Vec<ScheduleEvent>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub role_id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub roster: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub roster_id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub team: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub team_id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub timezone: String,
}

impl Schedule {
    /// New schedule for a role; server-assigned fields stay at their defaults
    pub fn new(role: impl Into<String>, timezone: impl Into<String>) -> Self {
        Schedule {
            role: role.into(),
            timezone: timezone.into(),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, start: i64, duration: i64) -> Self {
        self.events.push(ScheduleEvent { duration, start });
        self
    }

    pub fn with_auto_populate_threshold(mut self, days: i32) -> Self {
        self.auto_populate_threshold = days;
        self
    }

    pub fn with_advanced_mode(mut self, advanced: bool) -> Self {
        self.advanced_mode = i32::from(advanced);
        self
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced_mode != 0
    }
}
