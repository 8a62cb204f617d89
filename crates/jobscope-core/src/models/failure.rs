use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /rest_api/{version}/{project}/failures`.
///
/// Failed jobs are grouped by the most informative line of their console
/// output; `jobs` resolves the ids referenced from each line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureReport {
    #[serde(rename = "Project", default)]
    pub project: String,
    #[serde(rename = "Lines", default)]
    pub lines: Vec<FailureLine>,
    #[serde(rename = "Jobs", default)]
    pub jobs: HashMap<String, FailedJob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureLine {
    #[serde(rename = "Score", default)]
    pub score: f64,
    #[serde(rename = "Line")]
    pub line: String,
    #[serde(rename = "CommonLines", default)]
    pub common_lines: Vec<ScoredLine>,
    #[serde(rename = "Jobs", default)]
    pub jobs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredLine {
    #[serde(rename = "Score", default)]
    pub score: f64,
    #[serde(rename = "Line")]
    pub line: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailedJob {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ProcessingTime", default)]
    pub processing_time: Option<f64>,
    #[serde(rename = "Worker", default)]
    pub worker: Option<String>,
    #[serde(rename = "Failed", default)]
    pub failed: Option<String>,
}
