//! Client for the job service REST API.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use jobscope_core::config::UpstreamConfig;
use jobscope_core::error::{JobscopeError, Result};
use jobscope_core::models::{
    check_segment, FailureReport, JobCounts, JobList, JobOutput, ProjectList, ProjectStatus,
};

/// Reads project and job status from the job service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_root: Url,
}

impl ApiClient {
    /// Create a client for the configured job service.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let api_root = Url::parse(&config.api_root()).map_err(|e| {
            JobscopeError::Config(format!("Invalid upstream URL {:?}: {}", config.base_url, e))
        })?;
        if api_root.cannot_be_a_base() || api_root.host_str().is_none() {
            return Err(JobscopeError::Config(format!(
                "Upstream URL has no host: {:?}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("jobscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JobscopeError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, api_root })
    }

    /// Root of the versioned REST API.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// `GET /rest_api/{version}/projects`
    pub async fn list_projects(&self) -> Result<ProjectList> {
        self.get_json(self.endpoint(&["projects"])?).await
    }

    /// `GET /rest_api/{version}/{project}`
    pub async fn project_status(&self, project: &str) -> Result<ProjectStatus> {
        self.get_json(self.endpoint(&[project])?).await
    }

    /// `GET /rest_api/{version}/{project}/failures`
    pub async fn failures(&self, project: &str) -> Result<FailureReport> {
        self.get_json(self.endpoint(&[project, "failures"])?).await
    }

    /// `GET /rest_api/{version}/{project}/jobs/{job_id}/output`
    pub async fn job_output_for(&self, project: &str, job_id: &str) -> Result<JobOutput> {
        self.get_json(self.endpoint(&[project, "jobs", job_id, "output"])?)
            .await
    }

    /// Follow a job listing URL handed out by the job service.
    pub async fn jobs(&self, url: &str) -> Result<JobList> {
        self.get_json(self.resolve(url)?).await
    }

    /// Follow a job count URL handed out by the job service.
    pub async fn job_counts(&self, url: &str) -> Result<JobCounts> {
        self.get_json(self.resolve(url)?).await
    }

    /// Follow a job output URL handed out by the job service.
    pub async fn job_output(&self, url: &str) -> Result<JobOutput> {
        self.get_json(self.resolve(url)?).await
    }

    /// Parse a URL and check that it points at the job service.
    ///
    /// Scheme, host and port must match the configured upstream so the
    /// dashboard cannot be used to fetch arbitrary URLs.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|_| JobscopeError::ForbiddenUrl(url.to_string()))?;

        let same_origin = parsed.scheme() == self.api_root.scheme()
            && parsed.host_str() == self.api_root.host_str()
            && parsed.port_or_known_default() == self.api_root.port_or_known_default();

        if !same_origin {
            return Err(JobscopeError::ForbiddenUrl(url.to_string()));
        }
        Ok(parsed)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_root.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                JobscopeError::Config(format!("Upstream URL cannot be a base: {}", self.api_root))
            })?;
            path.pop_if_empty();
            for segment in segments {
                check_segment(segment)?;
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "Fetching from job service");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| JobscopeError::Upstream(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Job service returned an error");
            return Err(JobscopeError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| JobscopeError::Upstream(format!("{}: {}", url, e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| JobscopeError::Deserialization(format!("{}: {}", url, e)))
    }
}
