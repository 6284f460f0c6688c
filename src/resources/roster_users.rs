//! Roster membership operations

use super::{roster_path, MemberRequest};
use crate::client::OncallClient;
use crate::error::Result;
use crate::logger::LogLevel;
use crate::reconcile::reconcile;

impl OncallClient {
    /// List the usernames on a roster
    ///
    /// # API Endpoint
    /// GET /api/v0/teams/{team}/rosters/{roster}/users
    pub async fn get_roster_users(&self, team: &str, roster: &str) -> Result<Vec<String>> {
        self.get(&format!("{}/users", roster_path(team, roster)))
            .await
            .map_err(|e| e.context(format!("Fetching users of roster {team}/{roster}")))
    }

    /// Make the roster membership exactly `usernames`.
    ///
    /// Adds run before removals. The first failing call aborts; changes already
    /// applied stay applied.
    pub async fn set_roster_users(&self, team: &str, roster: &str, usernames: &[String]) -> Result<()> {
        self.log(
            LogLevel::Trace,
            &format!("Going to set roster {team}/{roster} users to: {usernames:?}"),
        );
        let current = self
            .get_roster_users(team, roster)
            .await
            .map_err(|e| e.context("Getting current list of roster users"))?;

        let diff = reconcile(&current, usernames);
        for user in &diff.add_only {
            self.add_roster_user(team, roster, user)
                .await
                .map_err(|e| e.context(format!("Adding user {user}")))?;
        }
        for user in &diff.remove_only {
            self.remove_roster_user(team, roster, user)
                .await
                .map_err(|e| e.context(format!("Removing user {user}")))?;
        }
        Ok(())
    }

    /// # API Endpoint
    /// POST /api/v0/teams/{team}/rosters/{roster}/users
    pub async fn add_roster_user(&self, team: &str, roster: &str, username: &str) -> Result<()> {
        self.log(
            LogLevel::Trace,
            &format!("Going to add {username} to roster {team}/{roster}"),
        );
        self.post(
            &format!("{}/users", roster_path(team, roster)),
            &MemberRequest { name: username },
        )
        .await
        .map_err(|e| e.context(format!("Adding user {username} to roster {team}/{roster}")))?;
        Ok(())
    }

    /// # API Endpoint
    /// DELETE /api/v0/teams/{team}/rosters/{roster}/users/{user}
    pub async fn remove_roster_user(&self, team: &str, roster: &str, username: &str) -> Result<()> {
        self.delete(&format!("{}/users/{username}", roster_path(team, roster)))
            .await
            .map_err(|e| e.context(format!("Removing user {username} from roster {team}/{roster}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::api_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USERS: &str = "/api/v0/teams/ops/rosters/primary/users";

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    async fn mount_current(server: &MockServer, current: &[&str]) {
        Mock::given(method("GET"))
            .and(path(USERS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(current)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_set_roster_users_applies_difference() {
        let server = MockServer::start().await;
        mount_current(&server, &["a", "b"]).await;
        Mock::given(method("POST"))
            .and(path(USERS))
            .and(body_json(json!({"name": "c"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{USERS}/b")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        api_client(&server)
            .set_roster_users("ops", "primary", &names(&["a", "c"]))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| !r.url.path().ends_with("/a")));
    }

    #[tokio::test]
    async fn test_set_roster_users_no_change() {
        let server = MockServer::start().await;
        mount_current(&server, &["a"]).await;

        api_client(&server)
            .set_roster_users("ops", "primary", &names(&["a", "a"]))
            .await
            .unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_roster_users_stops_on_failure() {
        let server = MockServer::start().await;
        mount_current(&server, &["a", "b"]).await;
        Mock::given(method("POST"))
            .and(path(USERS))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid user"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = api_client(&server)
            .set_roster_users("ops", "primary", &names(&["c"]))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(400));
        assert!(err.message.starts_with("Adding user c"));
    }
}
