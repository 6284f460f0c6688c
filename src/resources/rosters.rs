//! Roster management operations

use std::collections::HashMap;

use super::{roster_path, team_path};
use crate::client::OncallClient;
use crate::error::Result;
use crate::logger::LogLevel;
use crate::types::Roster;

impl OncallClient {
    /// List the roster names of a team
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/rosters
    pub async fn get_rosters(&self, team: &str) -> Result<Vec<String>> {
        let rosters: HashMap<String, serde_json::Value> = self
            .get(&format!("{}/rosters", team_path(team)))
            .await
            .map_err(|e| e.context(format!("Fetching list of rosters for {team}")))?;
        Ok(rosters.into_keys().collect())
    }

    /// Get a roster by name
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/rosters/{roster}
    pub async fn get_roster(&self, team: &str, name: &str) -> Result<Roster> {
        let mut roster: Roster = self
            .get(&roster_path(team, name))
            .await
            .map_err(|e| e.context(format!("Fetching roster details for {team}/{name}")))?;
        roster.name = name.to_string();
        Ok(roster)
    }

    /// Create a roster and return it as stored by the server.
    /// An already existing roster (422) is fetched and returned.
    ///
    /// # API Endpoint
    /// POST /api/v0/teams/{team}/rosters
    pub async fn create_roster(&self, team: &str, name: &str) -> Result<Roster> {
        let roster = Roster::new(name);

        self.log(LogLevel::Trace, &format!("Going to create roster {team}/{name}"));
        match self.post(&format!("{}/rosters", team_path(team)), &roster).await {
            Ok(_) => self.log(LogLevel::Trace, &format!("Successfully created roster {team}/{name}")),
            Err(e) if e.is_already_exists() => {
                self.log(LogLevel::Error, &format!("Roster {team}/{name} already created"));
            }
            Err(e) => return Err(e.context(format!("Creating roster {name}"))),
        }

        self.get_roster(team, name)
            .await
            .map_err(|e| e.context("Getting roster after create"))
    }

    /// Update a roster and return the refreshed roster.
    /// A non-empty `roster.name` renames it.
    ///
    /// # API Endpoint
    /// PUT /api/v0/teams/{team}/rosters/{roster}
    pub async fn update_roster(&self, team: &str, name: &str, roster: &Roster) -> Result<Roster> {
        self.put(&roster_path(team, name), roster)
            .await
            .map_err(|e| e.context(format!("Updating roster {team}/{name}")))?;

        let current_name = if roster.name.is_empty() { name } else { roster.name.as_str() };
        self.get_roster(team, current_name)
            .await
            .map_err(|e| e.context(format!("Updating roster {team}/{name}")))
    }

    /// Delete a roster
    ///
    /// # API Endpoint
    /// DELETE /api/v0/teams/{team}/rosters/{roster}
    pub async fn delete_roster(&self, team: &str, name: &str) -> Result<()> {
        self.delete(&roster_path(team, name))
            .await
            .map_err(|e| e.context(format!("Deleting roster {team}/{name}")))?;
        Ok(())
    }
}
