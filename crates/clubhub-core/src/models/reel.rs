use serde::{Deserialize, Serialize};

/// Short-form video. Only the YouTube id is stored; the site builds the player URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelRecord {
    pub id: String,
    pub title: String,
    pub video_id: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelPayload {
    pub title: String,
    pub video_id: String,
    pub thumbnail_url: Option<String>,
}
