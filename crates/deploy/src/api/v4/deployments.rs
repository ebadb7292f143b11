use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::api::client::{endpoint, ApiError, ApiRequest};
use crate::deployment::{DeploymentRecord, DeploymentStatus};
use crate::manifest::FileManifest;

/// Multipart field carrying the JSON metadata for every uploaded file.
pub const MANIFEST_FIELD: &str = "manifest";

/// Deployment as reported by the platform, before validation.
///
/// The stage arrives either as a flat `stage` string or as a
/// `latest_stage { name, status }` object depending on the API revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub latest_stage: Option<StagePayload>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePayload {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<DeploymentPayload> for DeploymentRecord {
    type Error = ApiError;

    fn try_from(payload: DeploymentPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::Malformed("deployment has no id".to_string()))?;

        let status = match (&payload.stage, &payload.latest_stage) {
            (Some(stage), _) => DeploymentStatus::from_stage(stage).ok_or_else(|| {
                ApiError::Malformed(format!("unrecognized deployment stage {:?}", stage))
            })?,
            (None, Some(latest)) => {
                DeploymentStatus::from_latest_stage(&latest.name, latest.status.as_deref())
                    .ok_or_else(|| {
                        ApiError::Malformed(format!(
                            "unrecognized deployment stage {:?} ({:?})",
                            latest.name, latest.status
                        ))
                    })?
            }
            (None, None) => {
                return Err(ApiError::Malformed(format!(
                    "deployment {} has no stage",
                    id
                )))
            }
        };

        Ok(DeploymentRecord {
            id,
            status,
            url: payload.url.filter(|url| !url.is_empty()),
            error_message: payload.error_message.filter(|msg| !msg.is_empty()),
        })
    }
}

/// Upload every file of a manifest as one deployment.
#[derive(Debug)]
pub struct CreateDeploymentRequest {
    pub project: String,
    pub form: Form,
}

impl CreateDeploymentRequest {
    /// Build the multipart body. Each file becomes one part named by its
    /// `/`-rooted path, followed by the `manifest` metadata part.
    pub fn new(project: &str, manifest: FileManifest) -> Result<Self, ApiError> {
        let metadata = serde_json::to_string(&manifest.metadata())?;

        let mut form = Form::new();
        for entry in manifest.into_entries() {
            let field = entry.field_name();
            let part = Part::bytes(entry.content)
                .file_name(entry.path)
                .mime_str(&entry.content_type)?;
            form = form.part(field, part);
        }
        let form = form.part(
            MANIFEST_FIELD,
            Part::text(metadata).mime_str("application/json")?,
        );

        Ok(Self {
            project: project.to_string(),
            form,
        })
    }
}

impl ApiRequest for CreateDeploymentRequest {
    type Response = DeploymentPayload;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(projects_url, &[self.project.as_str(), "deployments"])?;
        Ok(client.post(url).multipart(self.form))
    }
}

#[derive(Debug, Clone)]
pub struct GetDeploymentRequest {
    pub project: String,
    pub deployment_id: String,
}

impl ApiRequest for GetDeploymentRequest {
    type Response = DeploymentPayload;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(
            projects_url,
            &[
                self.project.as_str(),
                "deployments",
                self.deployment_id.as_str(),
            ],
        )?;
        Ok(client.get(url))
    }
}
