use crate::api::client::ApiError;
use crate::api::v4::projects::Project;
use crate::deployment::DeploymentRecord;
use crate::manifest::FileManifest;

/// Remote operations the deployment workflow depends on.
#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    /// Look up a project by name. `Ok(None)` when it does not exist.
    async fn get_project(&self, name: &str) -> Result<Option<Project>, ApiError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn create_project(&self, name: &str) -> Result<Project, ApiError>;

    /// Upload a manifest as a new deployment of `project`.
    async fn create_deployment(
        &self,
        project: &str,
        manifest: FileManifest,
    ) -> Result<DeploymentRecord, ApiError>;

    async fn get_deployment(
        &self,
        project: &str,
        deployment_id: &str,
    ) -> Result<DeploymentRecord, ApiError>;
}
