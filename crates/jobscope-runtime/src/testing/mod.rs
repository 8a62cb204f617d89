//! In-process stand-in for the job service, used by the client and
//! dashboard tests.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A job service serving fixed data for the projects `QSMRVDS` and
/// `MESOVDS4` on an ephemeral local port.
pub struct FakeJobService {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl FakeJobService {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let app = Router::new()
            .route("/rest_api/v4/projects", get(projects))
            .route("/rest_api/v4/{project}", get(project_status))
            .route("/rest_api/v4/{project}/jobs", get(jobs))
            .route("/rest_api/v4/{project}/jobs/count", get(job_counts))
            .route("/rest_api/v4/{project}/jobs/{job_id}/output", get(output))
            .route("/rest_api/v4/{project}/failures", get(failures))
            .route("/rest_api/v4/{project}/garbage", get(garbage))
            .with_state(base_url.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/rest_api/v4/{}", self.base_url, path)
    }
}

impl Drop for FakeJobService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn known(project: &str) -> bool {
    matches!(project, "QSMRVDS" | "MESOVDS4")
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "No such project"}))).into_response()
}

async fn projects(State(base): State<String>) -> Json<Value> {
    Json(json!({
        "Version": "v4",
        "Projects": [
            {
                "Id": "MESOVDS4",
                "Name": "Meso VDS",
                "CreatedAt": "2016-01-01T10:00:00",
                "CreatedBy": "admin",
                "Deadline": null,
                "LastJobAddedAt": null,
                "LastJobClaimedAt": null,
                "NrJobsAdded": 0,
                "NrJobsClaimed": 0,
                "NrJobsFinished": 0,
                "NrJobsFailed": 0,
                "TotalProcessingTime": 0.0,
                "PrioScore": null,
                "URLS": {"URL-Status": format!("{}/rest_api/v4/MESOVDS4", base)}
            },
            {
                "Id": "QSMRVDS",
                "Name": "QSMR VDS",
                "CreatedAt": "2016-01-01T10:00:00",
                "CreatedBy": "admin",
                "Deadline": "2016-02-01T00:00:00",
                "LastJobAddedAt": "2016-01-01T11:00:00",
                "LastJobClaimedAt": "2016-01-01T12:00:00",
                "NrJobsAdded": 10,
                "NrJobsClaimed": 4,
                "NrJobsFinished": 3,
                "NrJobsFailed": 1,
                "TotalProcessingTime": 120.0,
                "PrioScore": 2.5,
                "URLS": {"URL-Status": format!("{}/rest_api/v4/QSMRVDS", base)}
            }
        ]
    }))
}

async fn project_status(State(base): State<String>, Path(project): Path<String>) -> Response {
    if !known(&project) {
        return not_found();
    }
    let root = format!("{}/rest_api/v4/{}", base, project);
    Json(json!({
        "Project": project,
        "Version": "v4",
        "ETA": null,
        "JobStates": {"AVAILABLE": 6, "FINISHED": 3, "FAILED": 1},
        "URLS": {
            "URL-DailyCount": format!("{}/jobs/count?period=DAILY", root),
            "URL-Jobs": format!("{}/jobs", root),
            "URL-Workers": format!("{}/workers", root)
        }
    }))
    .into_response()
}

async fn jobs(State(base): State<String>, Path(project): Path<String>) -> Response {
    if !known(&project) {
        return not_found();
    }
    let root = format!("{}/rest_api/v4/{}", base, project);
    Json(json!({
        "Version": "v4",
        "Project": project,
        "Jobs": [
            {
                "Id": "1",
                "Type": "qsmr",
                "Worker": "worker1",
                "Status": "FINISHED",
                "Added": "2016-01-01T09:00:00",
                "Claimed": "2016-01-01T10:00:00",
                "Finished": "2016-01-01T10:00:06",
                "Failed": null,
                "ProcessingTime": 6.0,
                "URLS": {
                    "URL-Input": "http://odin.example.org/rest_api/v5/l1_log/7/1",
                    "URL-Output": format!("{}/jobs/1/output", root),
                    "URL-Result": null
                }
            },
            {
                "Id": "2",
                "Type": "qsmr",
                "Worker": "worker2",
                "Status": "FAILED",
                "Added": "2016-01-01T09:00:00",
                "Claimed": "2016-01-01T10:00:00",
                "Finished": null,
                "Failed": "2016-01-01T10:01:00",
                "ProcessingTime": 60.0,
                "URLS": {
                    "URL-Input": null,
                    "URL-Output": format!("{}/jobs/2/output", root),
                    "URL-Result": null
                }
            }
        ]
    }))
    .into_response()
}

fn period(root: &str, period: &str, values: [u64; 4]) -> Value {
    json!({
        "Period": period,
        "ActiveWorkers": values[0],
        "JobsClaimed": values[1],
        "JobsFinished": values[2],
        "JobsFailed": values[3],
        "URLS": {
            "URL-ActiveWorkers": format!("{}/workers?start={}", root, period),
            "URL-JobsClaimed": format!("{}/jobs?status=CLAIMED&start={}", root, period),
            "URL-JobsFinished": format!("{}/jobs?status=FINISHED&start={}", root, period),
            "URL-JobsFailed": format!("{}/jobs?status=FAILED&start={}", root, period),
            "URL-Zoom": format!("{}/jobs/count?period=HOURLY&start={}", root, period)
        }
    })
}

async fn job_counts(
    State(base): State<String>,
    Path(project): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !known(&project) {
        return not_found();
    }
    let root = format!("{}/rest_api/v4/{}", base, project);
    let body = match query.get("period").map(String::as_str) {
        Some("HOURLY") => json!({
            "Project": project,
            "PeriodType": "Hourly",
            "Counts": [period(&root, "2016-01-01T10:00:00", [2, 4, 3, 1])]
        }),
        _ => json!({
            "Project": project,
            "PeriodType": "Daily",
            "Counts": [
                period(&root, "2016-01-01", [2, 4, 3, 1]),
                period(&root, "2016-01-02", [0, 0, 0, 0])
            ]
        }),
    };
    Json(body).into_response()
}

async fn output(Path((project, job_id)): Path<(String, String)>) -> Response {
    if !known(&project) {
        return not_found();
    }
    Json(json!({"Output": format!("Job {}\nline one\nline two", job_id)})).into_response()
}

async fn failures(Path(project): Path<String>) -> Response {
    if !known(&project) {
        return not_found();
    }
    Json(json!({
        "Project": project,
        "Lines": [
            {
                "Score": 0.5,
                "Line": "Segmentation fault",
                "CommonLines": [
                    {"Score": 1.0, "Line": "Segmentation fault"},
                    {"Score": 0.25, "Line": "Retrying"}
                ],
                "Jobs": ["2", "9"]
            },
            {
                "Score": 2.0,
                "Line": "Timeout",
                "CommonLines": [],
                "Jobs": ["2"]
            }
        ],
        "Jobs": {
            "2": {
                "Id": "2",
                "ProcessingTime": 60.0,
                "Worker": "worker2",
                "Failed": "2016-01-01T10:01:00"
            }
        }
    }))
    .into_response()
}

async fn garbage() -> &'static str {
    "<html>not json</html>"
}
