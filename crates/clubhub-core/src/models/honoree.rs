use serde::{Deserialize, Serialize};

/// Hall-of-fame honoree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonoreeRecord {
    pub id: String,
    pub name: String,
    pub achievement: String,
    pub generation: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonoreePayload {
    pub name: String,
    pub achievement: String,
    pub generation: String,
    pub photo_url: Option<String>,
}
