use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastRecord {
    pub id: String,
    pub title: String,
    pub episode: u32,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub listen_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub guest_avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastPayload {
    pub title: String,
    pub episode: u32,
    pub guest_name: Option<String>,
    pub listen_url: Option<String>,
    pub cover_url: Option<String>,
    pub guest_avatar_url: Option<String>,
}
