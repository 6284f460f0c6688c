//! Team admin operations

use super::{team_path, MemberRequest};
use crate::client::OncallClient;
use crate::error::Result;
use crate::logger::{LogFields, LogLevel};
use crate::reconcile::reconcile;

impl OncallClient {
    fn log_team_admin(&self, action: &str, team: &str, username: &str, message: &str) {
        self.log_fields(
            LogLevel::Trace,
            LogFields::new("team_admin", action).team(team).subject(username),
            message,
        );
    }

    /// Usernames of the team's admins
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/admins
    pub async fn get_team_admins(&self, team: &str) -> Result<Vec<String>> {
        self.log_team_admin("get", team, "", "Getting team admins");
        self.get(&format!("{}/admins", team_path(team)))
            .await
            .map_err(|e| e.context(format!("Fetching list of admins for {team}")))
    }

    /// Authoritatively set the admins of a team.
    ///
    /// Adds run before removals. The first failing call aborts; changes already
    /// applied stay applied.
    pub async fn set_team_admins(&self, team: &str, usernames: &[String]) -> Result<()> {
        self.log_team_admin("set", team, "", &format!("Setting admins: {usernames:?}"));
        let current = self
            .get_team_admins(team)
            .await
            .map_err(|e| e.context(format!("Getting current list of team admins for {team}")))?;

        let diff = reconcile(&current, usernames);
        for user in &diff.add_only {
            self.add_team_admin(team, user).await?;
        }
        for user in &diff.remove_only {
            self.remove_team_admin(team, user).await?;
        }
        Ok(())
    }

    /// # API Endpoint
    /// POST /api/v0/teams/{team}/admins
    pub async fn add_team_admin(&self, team: &str, username: &str) -> Result<()> {
        self.log_team_admin("add", team, username, "Adding admin");
        self.post(&format!("{}/admins", team_path(team)), &MemberRequest { name: username })
            .await
            .map_err(|e| e.context(format!("Adding user {username} as admin on {team}")))?;
        Ok(())
    }

    /// # API Endpoint
    /// DELETE /api/v0/teams/{team}/admins/{user}
    pub async fn remove_team_admin(&self, team: &str, username: &str) -> Result<()> {
        self.log_team_admin("remove", team, username, "Removing admin");
        self.delete(&format!("{}/admins/{username}", team_path(team)))
            .await
            .map_err(|e| e.context(format!("Removing user {username} as admin on {team}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::{api_client, user_client};
    use crate::logger::testing::RecordingLogger;
    use crate::{Config, OncallClient};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADMINS: &str = "/api/v0/teams/ops/admins";

    #[tokio::test]
    async fn test_set_team_admins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMINS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["alice", "bob"])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ADMINS))
            .and(body_json(json!({"name": "carol"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{ADMINS}/alice")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        api_client(&server)
            .set_team_admins("ops", &["bob".to_string(), "carol".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_team_admin_with_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"csrf_token": "tok-9"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{ADMINS}/alice")))
            .and(header("x-csrf-token", "tok-9"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        user_client(&server).remove_team_admin("ops", "alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_team_admins_error_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMINS))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = api_client(&server).set_team_admins("ops", &[]).await.unwrap_err();
        assert!(err.message.starts_with("Getting current list of team admins for ops"));
        assert_eq!(err.http_status(), Some(404));
    }

    #[tokio::test]
    async fn test_add_team_admin_logs_structured_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMINS))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let logger = Arc::new(RecordingLogger::default());
        let client = OncallClient::with_logger(Config::new(server.uri()), logger.clone()).unwrap();
        client.add_team_admin("ops", "alice").await.unwrap();

        assert!(logger.has_fields("team_admin", "add", "ops", "alice"));
    }
}
