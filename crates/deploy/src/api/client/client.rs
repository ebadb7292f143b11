use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::{endpoint, ApiRequest};
use crate::api::v4::deployments::{CreateDeploymentRequest, GetDeploymentRequest};
use crate::api::v4::projects::{
    CreateProjectRequest, GetProjectRequest, ListProjectsRequest, Project,
};
use crate::api::{has_auth_error, join_messages, Envelope};
use crate::config::Credentials;
use crate::deployment::DeploymentRecord;
use crate::manifest::FileManifest;
use crate::platform::Platform;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_PREVIEW_CHARS: usize = 200;

/// Branch recorded on projects this tool creates.
pub const DEFAULT_PRODUCTION_BRANCH: &str = "main";

#[derive(Debug, Clone)]
pub struct PagesClient {
    projects_url: Url,
    client: Client,
}

impl PagesClient {
    pub fn new(api_url: &Url, credentials: &Credentials) -> Result<Self, ApiError> {
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(api_url.clone()));
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", credentials.token()))?;
        authorization.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, authorization);
        let client = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("pages-deploy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let projects_url = endpoint(
            api_url,
            &["accounts", credentials.account_id(), "pages", "projects"],
        )?;

        Ok(Self {
            projects_url,
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.projects_url, &self.client)?;
        let response = request_builder.send().await?;

        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }

    /// Get the account-scoped projects URL all requests are rooted at
    pub fn projects_url(&self) -> &Url {
        &self.projects_url
    }
}

/// Unwrap the platform envelope of a response body.
///
/// Non-success statuses keep the platform's error messages when the body is an
/// envelope, and the raw body otherwise.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        let errors = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();
        let message = join_messages(&errors).unwrap_or_else(|| match body.trim() {
            "" => status.canonical_reason().unwrap_or("no response body").to_string(),
            text => text.to_string(),
        });
        if has_auth_error(&errors) {
            return Err(ApiError::Unauthorized(status, message));
        }
        return Err(ApiError::HttpStatus(status, message));
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        ApiError::Malformed(format!("{} (body: {:?})", e, preview(body)))
    })?;

    if !envelope.success {
        let message =
            join_messages(&envelope.errors).unwrap_or_else(|| "Unknown error".to_string());
        if has_auth_error(&envelope.errors) {
            return Err(ApiError::Unauthorized(status, message));
        }
        return Err(ApiError::Rejected(status, message));
    }

    envelope
        .result
        .ok_or_else(|| ApiError::Malformed("response envelope has no result".to_string()))
}

fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if body.chars().count() > BODY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[async_trait::async_trait]
impl Platform for PagesClient {
    async fn get_project(&self, name: &str) -> Result<Option<Project>, ApiError> {
        match self
            .call(GetProjectRequest {
                name: name.to_string(),
            })
            .await
        {
            Ok(project) => Ok(Some(project)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.call(ListProjectsRequest).await
    }

    async fn create_project(&self, name: &str) -> Result<Project, ApiError> {
        self.call(CreateProjectRequest {
            name: name.to_string(),
            production_branch: DEFAULT_PRODUCTION_BRANCH.to_string(),
        })
        .await
    }

    async fn create_deployment(
        &self,
        project: &str,
        manifest: FileManifest,
    ) -> Result<DeploymentRecord, ApiError> {
        let request = CreateDeploymentRequest::new(project, manifest)?;
        let payload = self.call(request).await?;
        DeploymentRecord::try_from(payload)
    }

    async fn get_deployment(
        &self,
        project: &str,
        deployment_id: &str,
    ) -> Result<DeploymentRecord, ApiError> {
        let payload = self
            .call(GetDeploymentRequest {
                project: project.to_string(),
                deployment_id: deployment_id.to_string(),
            })
            .await?;
        DeploymentRecord::try_from(payload)
    }
}
