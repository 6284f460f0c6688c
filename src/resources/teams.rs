//! Team management operations

use chrono::Utc;

use super::{team_path, API_PREFIX};
use crate::client::OncallClient;
use crate::error::{Error, Result};
use crate::logger::LogLevel;
use crate::types::{Team, TeamConfig};

impl OncallClient {
    /// List the names of all teams
    ///
    /// # API Endpoint
    /// GET /api/v0/teams
    pub async fn get_teams(&self) -> Result<Vec<String>> {
        self.get(&format!("{API_PREFIX}/teams"))
            .await
            .map_err(|e| e.context("Fetching list of teams"))
    }

    /// Get a team by name, with roster names filled in
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}
    pub async fn get_team(&self, name: &str) -> Result<Team> {
        let mut team: Team = self
            .get(&team_path(name))
            .await
            .map_err(|e| e.context(format!("Fetching team details for {name}")))?;
        team.fill_roster_names();
        Ok(team)
    }

    /// Create a team and return it as stored by the server.
    ///
    /// Name and scheduling timezone are required. If the team already exists
    /// (422) the existing team is fetched and returned.
    ///
    /// # API Endpoint
    /// POST /api/v0/teams
    pub async fn create_team(&self, config: &TeamConfig) -> Result<Team> {
        if config.name.is_empty() || config.scheduling_timezone.is_empty() {
            return Err(Error::invalid_argument(
                "You must define both the team name and scheduling timezone",
            ));
        }

        self.log(LogLevel::Trace, &format!("Going to create team {config:?}"));
        match self.post(&format!("{API_PREFIX}/teams"), config).await {
            Ok(_) => self.log(LogLevel::Trace, &format!("Successfully created team {}", config.name)),
            Err(e) if e.is_already_exists() => {
                self.log(LogLevel::Error, &format!("Team {} already created", config.name));
            }
            Err(e) => return Err(e.context(format!("Creating team {}", config.name))),
        }

        self.get_team(&config.name)
            .await
            .map_err(|e| e.context("Getting team after create"))
    }

    /// Update a team's configuration and return the refreshed team.
    /// A non-empty `config.name` renames the team.
    ///
    /// # API Endpoint
    /// PUT /api/v0/teams/{team}
    pub async fn update_team(&self, name: &str, config: &TeamConfig) -> Result<Team> {
        self.put(&team_path(name), config)
            .await
            .map_err(|e| e.context(format!("Updating team {name}")))?;

        let current_name = if config.name.is_empty() { name } else { config.name.as_str() };
        self.get_team(current_name)
            .await
            .map_err(|e| e.context(format!("Updating team {name}")))
    }

    /// Delete a team.
    ///
    /// The team is first renamed to `<name>-deleted-<unix time>` so the original
    /// name is free for reuse, then the renamed team is deleted.
    ///
    /// # API Endpoint
    /// GET, PUT, then DELETE /api/v0/teams/{team}
    pub async fn delete_team(&self, name: &str) -> Result<()> {
        let existing = self
            .get_team(name)
            .await
            .map_err(|e| e.context(format!("Failed to fetch team {name} when attempting to delete")))?;

        let mut renamed = existing.config;
        renamed.name = format!("{name}-deleted-{}", Utc::now().timestamp());
        self.put(&team_path(name), &renamed).await.map_err(|e| {
            e.context(format!(
                "Failed to rename team from {name} to {} before delete",
                renamed.name
            ))
        })?;

        self.delete(&team_path(&renamed.name))
            .await
            .map_err(|e| e.context(format!("Deleting team {name}")))?;
        Ok(())
    }
}
