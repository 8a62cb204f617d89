use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use jobscope_core::config::DashboardSettings;
use jobscope_core::models::check_segment;

use super::DashboardState;

/// Page the sidebar marks as current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivePage {
    ServerStatus,
    Overview,
    Failures,
}

/// Base HTML template.
///
/// `project` selects the project the sidebar links point at.
fn base_template(
    settings: &DashboardSettings,
    title: &str,
    content: &str,
    active_page: ActivePage,
    project: &str,
) -> String {
    let active = |page: ActivePage| if page == active_page { "active" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {app_title}</title>
    <link rel="stylesheet" href="/assets/styles.css">
    <script src="/assets/plot.js" defer></script>
    <script src="/assets/main.js" defer></script>
</head>
<body data-refresh-secs="{refresh}">
    <div class="dashboard">
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1>{app_title}</h1>
                <span class="version">v{version}</span>
            </div>
            <ul class="nav-links">
                <li><a href="/" class="{status_active}">Server status</a></li>
                <li><a href="/projects/{project}" class="{overview_active}">Overview: {project}</a></li>
                <li><a href="/projects/{project}/failures" class="{failures_active}">Failures: {project}</a></li>
            </ul>
        </nav>
        <main class="content">
            <header class="content-header">
                <h2>{title}</h2>
                <div class="header-actions">
                    <span id="last-refresh" class="last-refresh"></span>
                    <button id="refresh-btn" class="btn btn-secondary">Refresh</button>
                </div>
            </header>
            <div class="content-body">
                {content}
            </div>
        </main>
    </div>
    <div id="tooltip" class="tooltip" hidden></div>
</body>
</html>"#,
        title = title,
        app_title = settings.title,
        refresh = settings.refresh_interval_secs,
        version = env!("CARGO_PKG_VERSION"),
        project = project,
        content = content,
        status_active = active(ActivePage::ServerStatus),
        overview_active = active(ActivePage::Overview),
        failures_active = active(ActivePage::Failures),
    )
}

/// Table shell filled in by `main.js` from `source`.
///
/// `columns` pairs a row field with its heading.
fn data_table(id: &str, source: &str, columns: &[(&str, &str)]) -> String {
    let headings: String = columns
        .iter()
        .map(|(key, heading)| format!(r#"<th data-key="{}">{}</th>"#, key, heading))
        .collect();
    format!(
        r#"<div class="panel-state" data-state="loading">Loading...</div>
                <table id="{id}" class="data-table" data-source="{source}">
                    <thead><tr>{headings}</tr></thead>
                    <tbody></tbody>
                </table>"#,
        id = id,
        source = source,
        headings = headings,
    )
}

fn bad_project() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html("<h1>Bad request</h1><p>Not a valid project name</p>"),
    )
        .into_response()
}

/// Server status page: every project on the job service.
pub async fn index(State(state): State<DashboardState>) -> Html<String> {
    let table = data_table(
        "projects-table",
        "/api/projects",
        &[
            ("priority", "Priority"),
            ("name", "Project"),
            ("jobs", "Jobs Tot/Left/Err"),
            ("average_time", "Average time (s)"),
            ("started", "Started"),
            ("deadline", "Deadline"),
            ("last_added", "Last added"),
            ("last_claimed", "Last claimed"),
        ],
    );
    let content = format!(
        r#"
        <div class="panel">
            <h3>Projects</h3>
            {table}
        </div>
    "#
    );

    Html(base_template(
        &state.settings,
        "Server status",
        &content,
        ActivePage::ServerStatus,
        &state.settings.default_project,
    ))
}

/// `/projects` goes to the configured default project.
pub async fn default_project(State(state): State<DashboardState>) -> Redirect {
    Redirect::temporary(&format!("/projects/{}", state.settings.default_project))
}

/// Project overview: header, job activity plot and jobs table.
pub async fn project_overview(
    State(state): State<DashboardState>,
    Path(project): Path<String>,
) -> Response {
    if check_segment(&project).is_err() {
        return bad_project();
    }

    let table = data_table(
        "jobs-table",
        "",
        &[
            ("id", "Job ID"),
            ("job_type", "Type"),
            ("worker", "Worker"),
            ("status", "Status"),
            ("added", "Added"),
            ("claimed", "Claimed"),
            ("finished", "Finished"),
            ("failed", "Failed"),
            ("duration", "Duration"),
            ("level2_url", "Level2 data"),
        ],
    );
    let content = format!(
        r#"
        <div id="project-header" class="panel" data-project="{project}">
            <div class="panel-state" data-state="loading">Loading...</div>
            <dl class="project-facts">
                <dt>Project</dt><dd data-field="project"></dd>
                <dt>ETA</dt><dd data-field="eta"></dd>
                <dt>Job states</dt><dd data-field="job_states"></dd>
            </dl>
        </div>

        <div class="chart-container full-width">
            <h3>Job activity</h3>
            <div class="panel-state" data-state="loading">Loading...</div>
            <canvas id="overview-plot" width="1000" height="260"></canvas>
            <ul id="plot-legend" class="plot-legend"></ul>
        </div>

        <div class="panel">
            <h3>Jobs</h3>
            {table}
        </div>
    "#
    );

    Html(base_template(
        &state.settings,
        &format!("Overview: {}", project),
        &content,
        ActivePage::Overview,
        &project,
    ))
    .into_response()
}

/// Failure analysis: output lines shared by failed jobs.
pub async fn failures(
    State(state): State<DashboardState>,
    Path(project): Path<String>,
) -> Response {
    if check_segment(&project).is_err() {
        return bad_project();
    }

    let lines = data_table(
        "failures-table",
        &format!("/api/projects/{}/failures", project),
        &[
            ("score", "Score"),
            ("line", "Output lines"),
            ("nr_jobs", "Nr jobs"),
        ],
    );
    let jobs = data_table(
        "failed-jobs-table",
        "",
        &[
            ("id", "Job ID"),
            ("processing_time", "Processing time (s)"),
            ("worker", "Worker"),
            ("failed", "Failed"),
        ],
    );
    let content = format!(
        r#"
        <div class="panels-row" data-project="{project}">
            <div class="panel">
                <h3>Failure lines</h3>
                {lines}
            </div>
            <div class="panel">
                <h3>Failed jobs</h3>
                <p id="failed-jobs-hint" class="empty-state">Select a line to list its jobs</p>
                {jobs}
            </div>
        </div>
    "#
    );

    Html(base_template(
        &state.settings,
        &format!("Failures: {}", project),
        &content,
        ActivePage::Failures,
        &project,
    ))
    .into_response()
}
