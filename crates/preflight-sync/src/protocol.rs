//! Wire protocol — JSON shapes shared with the aggregation server.
//!
//! Field names follow the server contract exactly, including the `IV`
//! suffix casing, so the serde renames here are load-bearing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `POST /register-app` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAppResponse {
    pub app_id: String,
}

/// One histogram entry of the anonymized upload: the deterministic
/// ciphertext of an action name, its IV, and how often the action occurs
/// in the current history window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedCount {
    #[serde(rename = "actionType")]
    pub action_type: String,
    #[serde(rename = "actionTypeIV")]
    pub action_type_iv: String,
    pub count: u64,
}

/// `POST /upload-anonymous-data` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub app_id: String,
    pub interactions: Vec<AnonymizedCount>,
}

/// `GET /global-model/{appId}` response. Keys of the counter and pattern
/// maps are ciphertexts; the sibling `*IVs` maps carry the IV for each.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalModelResponse {
    #[serde(default)]
    pub global_action_counter: HashMap<String, u64>,
    #[serde(rename = "globalActionCounterIVs", default)]
    pub global_action_counter_ivs: HashMap<String, String>,
    #[serde(default)]
    pub time_patterns: HashMap<String, HashMap<u8, u64>>,
    #[serde(rename = "timePatternsIVs", default)]
    pub time_patterns_ivs: HashMap<String, String>,
}
