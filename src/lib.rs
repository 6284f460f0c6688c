//! Client for the oncall scheduling REST API
//!
//! ```no_run
//! use oncall::{AuthMethod, Config, OncallClient, TeamConfig};
//!
//! # async fn run() -> oncall::Result<()> {
//! let client = OncallClient::new(
//!     Config::new("https://oncall.example.com")
//!         .with_credentials("jdoe", "secret")
//!         .with_auth_method(AuthMethod::User),
//! )?;
//!
//! let team = client.create_team(&TeamConfig::new("ops", "US/Central")).await?;
//! client.set_team_admins(team.name(), &["jdoe".to_string()]).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod reconcile;
mod resources;
pub mod types;

pub use auth::{Authenticator, Credentials, HmacAuthenticator, SessionAuthenticator};
pub use client::OncallClient;
pub use config::{AuthMethod, Config};
pub use error::{Error, ErrorCode, Result};
pub use logger::{LogFields, LogLevel, Logger, TracingLogger};
pub use reconcile::{reconcile, Reconciliation};
pub use types::{Contacts, Roster, RosterUser, Schedule, ScheduleEvent, Team, TeamConfig, User};

pub const VERSION_STRING: &str = concat!(env!("CARGO_PKG_VERSION"), " (oncall-client)");
