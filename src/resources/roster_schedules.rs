//! Roster schedule operations
//!
//! Schedules are addressed by role name within a roster but mutated through
//! `/schedules/{id}`, so most operations resolve the id first.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{roster_path, API_PREFIX};
use crate::client::OncallClient;
use crate::error::{Error, Result};
use crate::logger::{LogFields, LogLevel};
use crate::types::Schedule;

#[derive(Debug, Serialize)]
struct PopulateRequest {
    start: i64,
}

fn schedule_path(id: i64) -> String {
    format!("{API_PREFIX}/schedules/{id}")
}

impl OncallClient {
    fn log_schedule(&self, action: &str, team: &str, roster: &str, role: &str, message: &str) {
        self.log_fields(
            LogLevel::Trace,
            LogFields::new("roster_schedules", action)
                .team(team)
                .roster(roster)
                .subject(role),
            message,
        );
    }

    /// Schedules of a roster in the order the server lists them
    async fn list_roster_schedules(&self, team: &str, roster: &str) -> Result<Vec<Schedule>> {
        self.get(&format!("{}/schedules", roster_path(team, roster)))
            .await
            .map_err(|e| e.context(format!("Fetching schedules for roster {team}/{roster}")))
    }

    /// All schedules of a roster keyed by role
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/rosters/{roster}/schedules
    pub async fn get_roster_schedules(&self, team: &str, roster: &str) -> Result<HashMap<String, Schedule>> {
        self.log_schedule("getall", team, roster, "", "Getting all roster schedules");
        let schedules = self.list_roster_schedules(team, roster).await?;

        Ok(schedules
            .into_iter()
            .map(|s| (s.role.clone(), s))
            .collect())
    }

    /// Create a schedule on a roster
    ///
    /// # API Endpoint
    /// POST /api/v0/teams/{team}/rosters/{roster}/schedules
    pub async fn add_roster_schedule(&self, team: &str, roster: &str, schedule: &Schedule) -> Result<()> {
        self.log_schedule("add", team, roster, &schedule.role, "Going to add");
        self.post(&format!("{}/schedules", roster_path(team, roster)), schedule)
            .await
            .map_err(|e| {
                e.context(format!(
                    "Adding schedule {} to roster {team}/{roster}",
                    schedule.role
                ))
            })?;
        Ok(())
    }

    /// Find the schedule for a role, matching the role name case-insensitively
    pub async fn get_roster_schedule(&self, team: &str, roster: &str, role: &str) -> Result<Schedule> {
        self.log_schedule("get", team, roster, role, "Getting schedule");
        let schedules = self
            .list_roster_schedules(team, roster)
            .await
            .map_err(|e| e.context("Getting all schedules for roster"))?;

        // First match in server order wins when roles differ only by case
        schedules
            .into_iter()
            .find(|s| s.role.eq_ignore_ascii_case(role))
            .ok_or_else(|| Error::not_found(format!("Did not find schedule {role} in roster {team}/{roster}")))
    }

    /// Replace the schedule for a role
    ///
    /// # API Endpoint
    /// PUT /api/v0/schedules/{schedule_id}
    pub async fn update_roster_schedule(
        &self,
        team: &str,
        roster: &str,
        role: &str,
        schedule: &Schedule,
    ) -> Result<()> {
        self.log_schedule("update", team, roster, role, "Getting existing schedule");
        let current = self
            .get_roster_schedule(team, roster, role)
            .await
            .map_err(|e| e.context("Getting schedule for update"))?;

        self.put(&schedule_path(current.id), schedule)
            .await
            .map_err(|e| e.context(format!("Updating schedule {role} on roster {team}/{roster}")))?;
        Ok(())
    }

    /// Run the scheduler for a role from `start` onwards.
    ///
    /// `start` must not be in the past (1 second tolerance); this is checked
    /// before any request is made.
    ///
    /// # API Endpoint
    /// POST /api/v0/schedules/{schedule_id}/populate
    pub async fn populate_roster_schedule(
        &self,
        team: &str,
        roster: &str,
        role: &str,
        start: DateTime<Utc>,
    ) -> Result<()> {
        if start <= Utc::now() - Duration::seconds(1) {
            return Err(Error::invalid_argument(format!(
                "Populate time {start} must be after the current time"
            )));
        }

        self.log_schedule("populate", team, roster, role, "Getting existing schedule");
        let current = self
            .get_roster_schedule(team, roster, role)
            .await
            .map_err(|e| e.context("Getting schedule for populate"))?;

        self.log_schedule("populate", team, roster, role, "Going to populate");
        let body = PopulateRequest {
            start: start.timestamp(),
        };
        self.post(&format!("{}/populate", schedule_path(current.id)), &body)
            .await
            .map_err(|e| e.context(format!("Populating schedule {role} on roster {team}/{roster}")))?;
        Ok(())
    }

    /// # API Endpoint
    /// DELETE /api/v0/schedules/{schedule_id}
    pub async fn remove_roster_schedule_by_id(&self, schedule_id: i64) -> Result<()> {
        self.log_schedule("deleteByID", "", "", &schedule_id.to_string(), "Going to delete");
        self.delete(&schedule_path(schedule_id))
            .await
            .map_err(|e| e.context(format!("Removing schedule id {schedule_id}")))?;
        Ok(())
    }

    /// Delete the schedule for a role
    pub async fn remove_roster_schedule(&self, team: &str, roster: &str, role: &str) -> Result<()> {
        self.log_schedule("delete", team, roster, role, "Fetching schedule for delete");
        let schedule = self
            .get_roster_schedule(team, roster, role)
            .await
            .map_err(|e| e.context("Getting schedule for delete"))?;

        self.remove_roster_schedule_by_id(schedule.id).await
    }
}
