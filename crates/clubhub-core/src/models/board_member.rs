use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Executive or management board member as stored by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMemberRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub generation: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMemberPayload {
    pub name: String,
    pub role: String,
    pub generation: String,
    pub avatar_url: Option<String>,
    pub linkedin_url: Option<String>,
}
