use serde::{Deserialize, Serialize};

/// Contact channels of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacts {
    #[serde(deserialize_with = "super::null_as_default")]
    pub call: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub im: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub sms: String,
}

/// A user known to oncall
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// 1 when the user is active
    #[serde(deserialize_with = "super::null_as_default")]
    pub active: i32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub contacts: Contacts,
    #[serde(deserialize_with = "super::null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    pub photo_url: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub time_zone: String,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.active != 0
    }
}
