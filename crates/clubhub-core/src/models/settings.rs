use serde::{Deserialize, Serialize};

/// Global display configuration: which board generation the public site shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default, alias = "visible_generation")]
    pub visible_generation: Option<String>,
}
