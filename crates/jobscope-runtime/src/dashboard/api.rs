use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use jobscope_core::chart::ChartView;
use jobscope_core::display::{json_object_as_list, or_na, output_as_html};
use jobscope_core::error::JobscopeError;
use jobscope_core::tables::{
    job_rows, FailedJobRow, FailureRow, FailureTable, JobRow, ProjectRow, ProjectsTable,
};

use super::DashboardState;

/// API response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A failed API call, sent as an error [`ApiResponse`] with a matching status.
#[derive(Debug)]
pub struct ApiError(pub JobscopeError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            JobscopeError::InvalidArgument(_) | JobscopeError::InvalidTimestamp(_) => {
                StatusCode::BAD_REQUEST
            }
            JobscopeError::ForbiddenUrl(_) => StatusCode::FORBIDDEN,
            JobscopeError::NotFound(_) => StatusCode::NOT_FOUND,
            JobscopeError::UpstreamStatus { status: 404, .. } => StatusCode::NOT_FOUND,
            JobscopeError::Upstream(_)
            | JobscopeError::UpstreamStatus { .. }
            | JobscopeError::Deserialization(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JobscopeError> for ApiError {
    fn from(err: JobscopeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "API request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "API request rejected");
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// `?url=` parameter naming a job service document to follow.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

impl UrlQuery {
    fn require(self) -> Result<String, JobscopeError> {
        self.url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| JobscopeError::InvalidArgument("Missing url parameter".to_string()))
    }
}

/// Header block of the project overview page.
#[derive(Debug, Serialize)]
pub struct ProjectHeader {
    pub project: String,
    pub eta: String,
    /// Job states as an HTML list.
    pub job_states: String,
    /// Daily job counts, the plot's initial state.
    pub chart_url: String,
    /// Failed jobs, the jobs table's initial state.
    pub jobs_url: String,
    pub workers_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutputView {
    pub html: String,
}

/// An opened failure line.
#[derive(Debug, Serialize)]
pub struct FailureDetail {
    pub row: usize,
    pub line: String,
    pub common_lines: String,
    pub jobs: Vec<FailedJobRow>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

// ============================================================================
// Projects API
// ============================================================================

pub async fn list_projects(State(state): State<DashboardState>) -> ApiResult<Vec<ProjectRow>> {
    let list = state.client.list_projects().await?;
    ok(ProjectsTable::new(&list.projects).rows)
}

pub async fn get_project(
    State(state): State<DashboardState>,
    Path(project): Path<String>,
) -> ApiResult<ProjectHeader> {
    let status = state.client.project_status(&project).await?;
    ok(ProjectHeader {
        eta: or_na(status.eta.as_deref()),
        job_states: json_object_as_list(&status.job_states),
        chart_url: status.urls.daily_count.clone(),
        jobs_url: with_query(&status.urls.jobs, "status=FAILED"),
        workers_url: status.urls.workers.clone(),
        project: status.project,
    })
}

// ============================================================================
// Overview API
// ============================================================================

pub async fn get_chart(
    State(state): State<DashboardState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<ChartView> {
    let counts = state.client.job_counts(&query.require()?).await?;
    ok(ChartView::from_counts(&counts)?)
}

pub async fn list_jobs(
    State(state): State<DashboardState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<Vec<JobRow>> {
    let list = state.client.jobs(&query.require()?).await?;
    ok(job_rows(&list.jobs))
}

pub async fn get_output(
    State(state): State<DashboardState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<OutputView> {
    let output = state.client.job_output(&query.require()?).await?;
    ok(OutputView {
        html: output_as_html(&output.output),
    })
}

// ============================================================================
// Failures API
// ============================================================================

pub async fn list_failures(
    State(state): State<DashboardState>,
    Path(project): Path<String>,
) -> ApiResult<Vec<FailureRow>> {
    let table = FailureTable::from_report(state.client.failures(&project).await?);
    ok(table.rows())
}

pub async fn get_failure(
    State(state): State<DashboardState>,
    Path((project, row)): Path<(String, String)>,
) -> ApiResult<FailureDetail> {
    let row = parse_row(&row)?;
    let table = FailureTable::from_report(state.client.failures(&project).await?);
    ok(FailureDetail {
        row,
        line: table.line(row)?.line.clone(),
        common_lines: table.common_lines_html(row)?,
        jobs: table.failed_jobs(row)?,
    })
}

pub async fn get_job_output(
    State(state): State<DashboardState>,
    Path((project, job_id)): Path<(String, String)>,
) -> ApiResult<OutputView> {
    let output = state.client.job_output_for(&project, &job_id).await?;
    ok(OutputView {
        html: format!("<pre>{}</pre>", output.output),
    })
}

/// Any `/api` path without a route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError(JobscopeError::NotFound(format!("API route {}", uri.path())))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn parse_row(row: &str) -> Result<usize, JobscopeError> {
    row.parse()
        .map_err(|_| JobscopeError::InvalidArgument(format!("Row must be a number: {}", row)))
}

fn with_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use jobscope_core::config::{DashboardSettings, UpstreamConfig};
    use reqwest::Url;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::client::ApiClient;
    use crate::dashboard::create_api_router;
    use crate::testing::FakeJobService;

    fn router_for(base_url: &str) -> Router {
        let client = ApiClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap();
        create_api_router(DashboardState::new(client, DashboardSettings::default()))
    }

    fn with_url(path: &str, target: &str) -> String {
        let mut uri = Url::parse("http://dashboard.local").unwrap();
        uri.set_path(path);
        uri.query_pairs_mut().append_pair("url", target);
        format!("{}?{}", uri.path(), uri.query().unwrap())
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_api_response_constructors() {
        let ok = ApiResponse::success(3);
        assert!(ok.success);
        assert_eq!(ok.data, Some(3));

        let err = ApiResponse::<()>::error("boom");
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (JobscopeError::InvalidTimestamp("x".into()), StatusCode::BAD_REQUEST),
            (JobscopeError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (JobscopeError::ForbiddenUrl("x".into()), StatusCode::FORBIDDEN),
            (JobscopeError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                JobscopeError::UpstreamStatus { status: 404, url: "x".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                JobscopeError::UpstreamStatus { status: 500, url: "x".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (JobscopeError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (JobscopeError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("http://h/jobs", "status=FAILED"), "http://h/jobs?status=FAILED");
        assert_eq!(
            with_query("http://h/jobs?type=qsmr", "status=FAILED"),
            "http://h/jobs?type=qsmr&status=FAILED"
        );
    }

    #[tokio::test]
    async fn test_projects_by_priority() {
        let service = FakeJobService::spawn().await;
        let (status, body) = get(router_for(&service.base_url), "/projects").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows[0]["id"], "QSMRVDS");
        assert_eq!(rows[0]["details_url"], "/projects/QSMRVDS");
        assert_eq!(rows[1]["id"], "MESOVDS4");
        assert_eq!(rows[1]["priority"], "<i>N/A</i>");
    }

    #[tokio::test]
    async fn test_project_header() {
        let service = FakeJobService::spawn().await;
        let (status, body) = get(router_for(&service.base_url), "/projects/QSMRVDS").await;

        assert_eq!(status, StatusCode::OK);
        let header = &body["data"];
        assert_eq!(header["project"], "QSMRVDS");
        assert_eq!(header["eta"], "<i>N/A</i>");
        assert_eq!(
            header["job_states"],
            "<ul><li>AVAILABLE: 6</li><li>FINISHED: 3</li><li>FAILED: 1</li></ul>"
        );
        assert_eq!(
            header["jobs_url"],
            service.api_url("QSMRVDS/jobs?status=FAILED").as_str()
        );
    }

    #[tokio::test]
    async fn test_unknown_and_invalid_project() {
        let service = FakeJobService::spawn().await;

        let (status, body) = get(router_for(&service.base_url), "/projects/NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = get(router_for(&service.base_url), "/projects/bad%20name").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chart_follows_counts_url() {
        let service = FakeJobService::spawn().await;
        let uri = with_url("/chart", &service.api_url("QSMRVDS/jobs/count?period=DAILY"));
        let (status, body) = get(router_for(&service.base_url), &uri).await;

        assert_eq!(status, StatusCode::OK);
        let chart = &body["data"];
        assert_eq!(chart["period_type"], "Daily");
        assert_eq!(chart["bar_width_ms"], 14_400_000);
        assert_eq!(chart["series"].as_array().unwrap().len(), 4);
        assert_eq!(chart["background_action"]["kind"], "nothing");

        let drill = &chart["series"][2]["points"][0]["action"];
        assert_eq!(drill["kind"], "drill");
        assert!(drill["zoom_url"].as_str().unwrap().contains("period=HOURLY"));
    }

    #[tokio::test]
    async fn test_chart_rejects_foreign_url() {
        let service = FakeJobService::spawn().await;
        let uri = with_url("/chart", "http://evil.example.org/rest_api/v4/x/jobs/count");
        let (status, body) = get(router_for(&service.base_url), &uri).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_missing_url_parameter() {
        let service = FakeJobService::spawn().await;
        let (status, body) = get(router_for(&service.base_url), "/jobs").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid argument: Missing url parameter");
    }

    #[tokio::test]
    async fn test_jobs_table_rows() {
        let service = FakeJobService::spawn().await;
        let uri = with_url("/jobs", &service.api_url("QSMRVDS/jobs?status=FAILED"));
        let (status, body) = get(router_for(&service.base_url), &uri).await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows[0]["duration"], "6s");
        assert_eq!(
            rows[0]["level2_url"],
            "http://odin.example.org/rest_api/v5/level2/QSMRVDS/7/1"
        );
        assert_eq!(rows[1]["duration"], "60s");
        assert_eq!(rows[1]["level2_url"], Value::Null);
    }

    #[tokio::test]
    async fn test_output_as_html() {
        let service = FakeJobService::spawn().await;
        let uri = with_url("/output", &service.api_url("QSMRVDS/jobs/1/output"));
        let (_, body) = get(router_for(&service.base_url), &uri).await;

        assert_eq!(body["data"]["html"], "Job 1<br>line one<br>line two");
    }

    #[tokio::test]
    async fn test_failures() {
        let service = FakeJobService::spawn().await;
        let router = router_for(&service.base_url);

        let (status, body) = get(router.clone(), "/projects/QSMRVDS/failures").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows[0]["line"], "Timeout (0)");
        assert_eq!(rows[1]["line"], "Segmentation fault (2)");

        let (status, body) = get(router.clone(), "/projects/QSMRVDS/failures/1").await;
        assert_eq!(status, StatusCode::OK);
        let detail = &body["data"];
        assert_eq!(detail["line"], "Segmentation fault");
        assert!(detail["common_lines"].as_str().unwrap().contains("Retrying"));
        assert_eq!(detail["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(detail["jobs"][0]["worker"], "worker2");

        let (status, _) = get(router, "/projects/QSMRVDS/failures/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failure_row_must_be_a_number() {
        let service = FakeJobService::spawn().await;
        let (status, body) = get(router_for(&service.base_url), "/projects/QSMRVDS/failures/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid argument: Row must be a number: abc");
    }

    #[tokio::test]
    async fn test_unknown_api_route() {
        let (status, body) = get(router_for("http://127.0.0.1:9"), "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Not found: API route /nope");
    }

    #[tokio::test]
    async fn test_job_output_by_id() {
        let service = FakeJobService::spawn().await;
        let (_, body) = get(router_for(&service.base_url), "/projects/QSMRVDS/jobs/2/output").await;

        assert_eq!(body["data"]["html"], "<pre>Job 2\nline one\nline two</pre>");
    }

    #[tokio::test]
    async fn test_upstream_unreachable() {
        let (status, body) = get(router_for("http://127.0.0.1:9"), "/projects").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
    }
}
