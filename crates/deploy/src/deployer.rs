use std::fmt;

use crate::api::client::PagesClient;
use crate::config::DeployConfig;
use crate::deployment::{self, DeploymentRecord};
use crate::error::{DeployError, Step};
use crate::manifest::{self, FileManifest};
use crate::platform::Platform;
use crate::project::{self, ProjectRef};

/// Runs one deployment: ensure project, build manifest, upload, await completion.
pub struct DeploymentClient<P = PagesClient> {
    platform: P,
    config: DeployConfig,
}

impl DeploymentClient<PagesClient> {
    /// Build the HTTP-backed client from the run's configuration.
    pub fn from_config(config: DeployConfig) -> Result<Self, DeployError> {
        let platform = PagesClient::new(&config.api_url, &config.credentials)
            .map_err(DeployError::ClientSetup)?;
        Ok(Self::new(platform, config))
    }
}

impl<P: Platform> DeploymentClient<P> {
    pub fn new(platform: P, config: DeployConfig) -> Self {
        Self { platform, config }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub async fn ensure_project(&self) -> Result<ProjectRef, DeployError> {
        project::ensure_project(
            &self.platform,
            &self.config.project,
            self.config.create_new,
            self.config.unique,
        )
        .await
    }

    pub fn build_manifest(&self) -> Result<FileManifest, DeployError> {
        let manifest = manifest::build_manifest(&self.config.directory)?;
        tracing::info!(
            directory = %self.config.directory.display(),
            files = manifest.len(),
            bytes = manifest.total_bytes(),
            "built manifest"
        );
        Ok(manifest)
    }

    /// Send the whole manifest as one deployment. Any failure fails the step.
    pub async fn upload(
        &self,
        project: &ProjectRef,
        manifest: FileManifest,
    ) -> Result<DeploymentRecord, DeployError> {
        let record = self
            .platform
            .create_deployment(&project.name, manifest)
            .await
            .map_err(|e| DeployError::from_api(Step::Upload, e))?;
        tracing::info!(
            project = %project.name,
            deployment = %record.id,
            status = %record.status,
            "deployment created"
        );
        Ok(record)
    }

    pub async fn await_completion(
        &self,
        project: &ProjectRef,
        deployment_id: &str,
    ) -> Result<DeploymentRecord, DeployError> {
        deployment::await_completion(
            &self.platform,
            &project.name,
            deployment_id,
            self.config.poll,
        )
        .await
    }

    /// Run every step in order. The directory is checked before any request.
    pub async fn deploy(&self) -> Result<DeploymentOutcome, DeployError> {
        self.config.validate_directory()?;

        let project = self.ensure_project().await?;
        let manifest = self.build_manifest()?;
        let files = manifest.len();
        let bytes = manifest.total_bytes();

        let queued = self.upload(&project, manifest).await?;
        let record = self.await_completion(&project, &queued.id).await?;

        Ok(DeploymentOutcome {
            project,
            files,
            bytes,
            record,
        })
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub project: ProjectRef,
    pub files: usize,
    pub bytes: u64,
    pub record: DeploymentRecord,
}

impl fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deployment {} succeeded for project '{}' ({} files, {} bytes)",
            self.record.id, self.project.name, self.files, self.bytes
        )?;
        if let Some(url) = &self.record.url {
            write!(f, "\nYour site is live at: {}", url)?;
        }
        Ok(())
    }
}
