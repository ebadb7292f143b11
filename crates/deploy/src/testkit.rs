//! In-memory platform for exercising the workflow without a network.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::api::client::ApiError;
use crate::api::v4::projects::Project;
use crate::deployment::{DeploymentRecord, DeploymentStatus};
use crate::manifest::FileManifest;
use crate::platform::Platform;

pub const DEPLOYMENT_ID: &str = "d-1";

#[derive(Default)]
struct Inner {
    projects: Vec<String>,
    statuses: VecDeque<DeploymentStatus>,
    error_message: Option<String>,
    status_error: Option<(StatusCode, String)>,
    status_delay: Option<Duration>,
    calls: Vec<String>,
    uploads: Vec<(String, FileManifest)>,
    status_polls: u32,
}

#[derive(Default)]
pub struct FakePlatform {
    inner: Mutex<Inner>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.inner
            .lock()
            .projects
            .extend(names.into_iter().map(str::to_string));
        self
    }

    /// Statuses returned by successive polls; the last one repeats.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = DeploymentStatus>) -> Self {
        self.inner.lock().statuses.extend(statuses);
        self
    }

    pub fn with_error_message(self, message: &str) -> Self {
        self.inner.lock().error_message = Some(message.to_string());
        self
    }

    pub fn with_status_error(self, status: StatusCode, message: &str) -> Self {
        self.inner.lock().status_error = Some((status, message.to_string()));
        self
    }

    pub fn with_status_delay(self, delay: Duration) -> Self {
        self.inner.lock().status_delay = Some(delay);
        self
    }

    /// Every remote call made, in order, e.g. `get_project docs`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    pub fn projects(&self) -> Vec<String> {
        self.inner.lock().projects.clone()
    }

    pub fn uploads(&self) -> Vec<(String, FileManifest)> {
        self.inner.lock().uploads.clone()
    }

    pub fn status_polls(&self) -> u32 {
        self.inner.lock().status_polls
    }

    fn record(&self, call: String) {
        self.inner.lock().calls.push(call);
    }
}

fn project(name: &str) -> Project {
    Project {
        name: name.to_string(),
        id: None,
        subdomain: Some(format!("{}.pages.dev", name)),
        production_branch: Some("main".to_string()),
    }
}

#[async_trait::async_trait]
impl Platform for FakePlatform {
    async fn get_project(&self, name: &str) -> Result<Option<Project>, ApiError> {
        self.record(format!("get_project {}", name));
        let inner = self.inner.lock();
        Ok(inner.projects.iter().find(|p| *p == name).map(|p| project(p)))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.record("list_projects".to_string());
        Ok(self.inner.lock().projects.iter().map(|p| project(p)).collect())
    }

    async fn create_project(&self, name: &str) -> Result<Project, ApiError> {
        self.record(format!("create_project {}", name));
        self.inner.lock().projects.push(name.to_string());
        Ok(project(name))
    }

    async fn create_deployment(
        &self,
        project: &str,
        manifest: FileManifest,
    ) -> Result<DeploymentRecord, ApiError> {
        self.record(format!("create_deployment {}", project));
        self.inner
            .lock()
            .uploads
            .push((project.to_string(), manifest));
        Ok(DeploymentRecord {
            id: DEPLOYMENT_ID.to_string(),
            status: DeploymentStatus::Queued,
            url: None,
            error_message: None,
        })
    }

    async fn get_deployment(
        &self,
        project: &str,
        deployment_id: &str,
    ) -> Result<DeploymentRecord, ApiError> {
        self.record(format!("get_deployment {} {}", project, deployment_id));

        let delay = self.inner.lock().status_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock();
        inner.status_polls += 1;
        if let Some((status, message)) = inner.status_error.clone() {
            return Err(ApiError::HttpStatus(status, message));
        }

        let status = if inner.statuses.len() > 1 {
            inner.statuses.pop_front()
        } else {
            inner.statuses.front().copied()
        }
        .unwrap_or(DeploymentStatus::Queued);

        Ok(DeploymentRecord {
            id: deployment_id.to_string(),
            status,
            url: (status == DeploymentStatus::Success)
                .then(|| format!("https://{}.{}.pages.dev", deployment_id, project)),
            error_message: (status == DeploymentStatus::Failure)
                .then(|| inner.error_message.clone())
                .flatten(),
        })
    }
}
