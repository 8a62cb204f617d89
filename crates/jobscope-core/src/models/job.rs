use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::JobscopeError;

/// Response of a job listing URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(rename = "Project", default)]
    pub project: Option<String>,
    #[serde(rename = "Jobs", default)]
    pub jobs: Vec<Job>,
}

/// A job as listed by the job service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Type", default)]
    pub job_type: Option<String>,
    #[serde(rename = "Worker", default)]
    pub worker: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Added", default)]
    pub added: Option<String>,
    #[serde(rename = "Claimed", default)]
    pub claimed: Option<String>,
    #[serde(rename = "Finished", default)]
    pub finished: Option<String>,
    #[serde(rename = "Failed", default)]
    pub failed: Option<String>,
    #[serde(rename = "ProcessingTime", default)]
    pub processing_time: Option<f64>,
    #[serde(rename = "URLS", default)]
    pub urls: JobUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUrls {
    #[serde(rename = "URL-Input", default)]
    pub input: Option<String>,
    #[serde(rename = "URL-Output", default)]
    pub output: Option<String>,
    #[serde(rename = "URL-Result", default)]
    pub result: Option<String>,
}

/// Console output stored for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobOutput {
    #[serde(rename = "Output", default)]
    pub output: String,
}

/// Bucket size of a job count document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodType {
    Daily,
    Hourly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "Daily",
            PeriodType::Hourly => "Hourly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = JobscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(PeriodType::Daily),
            "hourly" => Ok(PeriodType::Hourly),
            _ => Err(JobscopeError::InvalidArgument(format!(
                "Unknown period type: {}",
                s
            ))),
        }
    }
}

impl Serialize for PeriodType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PeriodType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Response of a job count URL: claimed/finished/failed per period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCounts {
    #[serde(rename = "Project", default)]
    pub project: Option<String>,
    #[serde(rename = "PeriodType")]
    pub period_type: PeriodType,
    #[serde(rename = "Counts", default)]
    pub counts: Vec<PeriodCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodCount {
    /// Start of the bucket, a date or a date-time.
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "ActiveWorkers", default)]
    pub active_workers: u64,
    #[serde(rename = "JobsClaimed", default)]
    pub jobs_claimed: u64,
    #[serde(rename = "JobsFinished", default)]
    pub jobs_finished: u64,
    #[serde(rename = "JobsFailed", default)]
    pub jobs_failed: u64,
    #[serde(rename = "URLS")]
    pub urls: PeriodUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodUrls {
    #[serde(rename = "URL-ActiveWorkers")]
    pub active_workers: String,
    #[serde(rename = "URL-JobsClaimed")]
    pub jobs_claimed: String,
    #[serde(rename = "URL-JobsFinished")]
    pub jobs_finished: String,
    #[serde(rename = "URL-JobsFailed")]
    pub jobs_failed: String,
    #[serde(rename = "URL-Zoom")]
    pub zoom: String,
}
