use serde::{Deserialize, Serialize};

/// Response of `GET /rest_api/{version}/projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectList {
    #[serde(rename = "Projects", default)]
    pub projects: Vec<ProjectSummary>,
}

/// One entry in the project listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<String>,
    #[serde(rename = "Deadline", default)]
    pub deadline: Option<String>,
    #[serde(rename = "LastJobAddedAt", default)]
    pub last_job_added_at: Option<String>,
    #[serde(rename = "LastJobClaimedAt", default)]
    pub last_job_claimed_at: Option<String>,
    #[serde(rename = "NrJobsAdded", default)]
    pub nr_jobs_added: u64,
    #[serde(rename = "NrJobsClaimed", default)]
    pub nr_jobs_claimed: u64,
    #[serde(rename = "NrJobsFinished", default)]
    pub nr_jobs_finished: u64,
    #[serde(rename = "NrJobsFailed", default)]
    pub nr_jobs_failed: u64,
    /// Sum of processing time over all finished and failed jobs, in seconds.
    #[serde(rename = "TotalProcessingTime", default)]
    pub total_processing_time: Option<f64>,
    #[serde(rename = "PrioScore", default)]
    pub prio_score: Option<f64>,
    #[serde(rename = "URLS", default)]
    pub urls: ProjectUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUrls {
    #[serde(rename = "URL-Status", default)]
    pub status: Option<String>,
}

/// Response of `GET /rest_api/{version}/{project}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatus {
    #[serde(rename = "Project")]
    pub project: String,
    /// Estimated time left, `None` when no worker claimed anything lately.
    #[serde(rename = "ETA", default)]
    pub eta: Option<String>,
    /// Job count per state, e.g. `{"Available": 3, "Failed": 1}`, in the
    /// order the job service lists them.
    #[serde(rename = "JobStates", default)]
    pub job_states: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "URLS")]
    pub urls: ProjectStatusUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatusUrls {
    #[serde(rename = "URL-DailyCount")]
    pub daily_count: String,
    #[serde(rename = "URL-Jobs")]
    pub jobs: String,
    #[serde(rename = "URL-Workers", default)]
    pub workers: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_summary_from_listing() {
        let json = r#"{
            "Projects": [{
                "Id": "myproject",
                "Name": "My Project",
                "Environment": {},
                "CreatedAt": "2016-01-01T10:00:00",
                "CreatedBy": "admin",
                "LastJobAddedAt": null,
                "NrJobsAdded": 0,
                "LastJobClaimedAt": null,
                "NrJobsClaimed": 0,
                "Deadline": null,
                "NrJobsFinished": 0,
                "NrJobsFailed": 0,
                "TotalProcessingTime": 0.0,
                "PrioScore": null,
                "URLS": {"URL-Status": "http://localhost/rest_api/v4/myproject", "URL-Processing-image": null}
            }]
        }"#;

        let list: ProjectList = serde_json::from_str(json).unwrap();
        assert_eq!(list.projects.len(), 1);
        let project = &list.projects[0];
        assert_eq!(project.id, "myproject");
        assert_eq!(project.name.as_deref(), Some("My Project"));
        assert!(project.prio_score.is_none());
        assert!(project.deadline.is_none());
        assert_eq!(
            project.urls.status.as_deref(),
            Some("http://localhost/rest_api/v4/myproject")
        );
    }

    #[test]
    fn test_project_status() {
        let json = r#"{
            "Project": "QSMRVDS",
            "Version": "v4",
            "ETA": "1:00:00",
            "JobStates": {"Failed": 1, "Available": 3},
            "URLS": {
                "URL-DailyCount": "http://localhost/rest_api/v4/QSMRVDS/jobs/count?period=daily",
                "URL-Jobs": "http://localhost/rest_api/v4/QSMRVDS/jobs",
                "URL-Workers": "http://localhost/rest_api/v4/QSMRVDS/workers"
            }
        }"#;

        let status: ProjectStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.project, "QSMRVDS");
        assert_eq!(status.eta.as_deref(), Some("1:00:00"));
        assert_eq!(status.job_states["Available"], 3);
        let states: Vec<&str> = status.job_states.keys().map(String::as_str).collect();
        assert_eq!(states, ["Failed", "Available"]);
        assert!(status.urls.jobs.ends_with("/QSMRVDS/jobs"));
    }
}
