/**
 * HTTP access to the Pages REST API.
 *  - `client`: authenticated reqwest client and envelope decoding
 *  - `v4`: typed request/response pairs per endpoint
 */
pub mod api;
pub mod config;
/**
 * The deployment workflow: ensure project, build manifest,
 *  upload, await completion.
 */
pub mod deployer;
pub mod deployment;
pub mod error;
pub mod logging;
pub mod manifest;
/**
 * Seam between the workflow and the remote platform.
 *  Implemented over HTTP by `api::client::PagesClient`.
 */
pub mod platform;
pub mod project;
/**
 * Helper for reporting build version information
 *  captured at compile time.
 */
pub mod version;

#[cfg(test)]
pub(crate) mod testkit;

pub mod prelude {
    pub use crate::api::client::{ApiError, PagesClient};
    pub use crate::config::{Credentials, DeployConfig, DEFAULT_API_URL};
    pub use crate::deployer::{DeploymentClient, DeploymentOutcome};
    pub use crate::deployment::{DeploymentRecord, DeploymentStatus, PollSettings};
    pub use crate::error::{DeployError, Step};
    pub use crate::manifest::{build_manifest, FileManifest, ManifestEntry};
    pub use crate::platform::Platform;
    pub use crate::project::ProjectRef;
    pub use crate::version::build_info;
}
