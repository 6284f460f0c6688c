//! Team user operations

use super::{team_path, MemberRequest};
use crate::client::OncallClient;
use crate::error::Result;
use crate::logger::{LogFields, LogLevel};
use crate::reconcile::reconcile;

impl OncallClient {
    fn log_team_user(&self, action: &str, team: &str, username: &str, message: &str) {
        self.log_fields(
            LogLevel::Trace,
            LogFields::new("team_user", action).team(team).subject(username),
            message,
        );
    }

    /// Usernames of the team's members
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/users
    pub async fn get_team_users(&self, team: &str) -> Result<Vec<String>> {
        self.log_team_user("get", team, "", "Getting team users");
        self.get(&format!("{}/users", team_path(team)))
            .await
            .map_err(|e| e.context(format!("Fetching list of users for {team}")))
    }

    /// Authoritatively set the users of a team.
    ///
    /// Adds run before removals. The first failing call aborts; changes already
    /// applied stay applied.
    pub async fn set_team_users(&self, team: &str, usernames: &[String]) -> Result<()> {
        self.log_team_user("set", team, "", &format!("Setting users: {usernames:?}"));
        let current = self
            .get_team_users(team)
            .await
            .map_err(|e| e.context(format!("Getting current list of team users for {team}")))?;

        let diff = reconcile(&current, usernames);
        for user in &diff.add_only {
            self.add_team_user(team, user).await?;
        }
        for user in &diff.remove_only {
            self.remove_team_user(team, user).await?;
        }
        Ok(())
    }

    /// # API Endpoint
    /// POST /api/v0/teams/{team}/users
    pub async fn add_team_user(&self, team: &str, username: &str) -> Result<()> {
        self.log_team_user("add", team, username, "Adding user");
        self.post(&format!("{}/users", team_path(team)), &MemberRequest { name: username })
            .await
            .map_err(|e| e.context(format!("Adding user {username} to team {team}")))?;
        Ok(())
    }

    /// # API Endpoint
    /// DELETE /api/v0/teams/{team}/users/{user}
    pub async fn remove_team_user(&self, team: &str, username: &str) -> Result<()> {
        self.log_team_user("remove", team, username, "Removing user");
        self.delete(&format!("{}/users/{username}", team_path(team)))
            .await
            .map_err(|e| e.context(format!("Removing user {username} from team {team}")))?;
        Ok(())
    }
}
