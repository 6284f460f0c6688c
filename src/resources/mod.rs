//! Typed operations on oncall resources
//!
//! Each submodule adds methods to [`OncallClient`](crate::OncallClient) for one
//! resource family.

mod roster_schedules;
mod roster_users;
mod rosters;
mod team_admins;
mod team_users;
mod teams;

use serde::Serialize;

pub(crate) const API_PREFIX: &str = "/api/v0";

/// Body of every add-member call
#[derive(Debug, Serialize)]
pub(crate) struct MemberRequest<'a> {
    pub name: &'a str,
}

pub(crate) fn team_path(team: &str) -> String {
    format!("{API_PREFIX}/teams/{team}")
}

pub(crate) fn roster_path(team: &str, roster: &str) -> String {
    format!("{API_PREFIX}/teams/{team}/rosters/{roster}")
}
