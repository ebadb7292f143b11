use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;

use crate::api::client::ApiError;
use crate::deployment::DeploymentStatus;

/// The workflow step an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EnsureProject,
    BuildManifest,
    Upload,
    AwaitCompletion,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::EnsureProject => "ensure project",
            Step::BuildManifest => "build manifest",
            Step::Upload => "upload",
            Step::AwaitCompletion => "await completion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to create API client: {0}")]
    ClientSetup(#[source] ApiError),

    #[error("{step}: authentication rejected ({status}): {message}")]
    Auth {
        step: Step,
        status: StatusCode,
        message: String,
    },

    #[error("ensure project: project '{name}' not found{}", available_hint(.available))]
    ProjectNotFound { name: String, available: Vec<String> },

    #[error("build manifest: directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("build manifest: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload: platform returned {status}: {body}")]
    UploadFailed { status: StatusCode, body: String },

    #[error(
        "await completion: deployment {id} did not finish within {} seconds (last status: {last_status})",
        .timeout.as_secs()
    )]
    DeploymentTimeout {
        id: String,
        timeout: Duration,
        last_status: DeploymentStatus,
    },

    #[error("await completion: deployment {id} failed: {message}")]
    DeploymentFailed { id: String, message: String },

    #[error("{step}: network error: {source}")]
    Network {
        step: Step,
        source: reqwest::Error,
    },

    #[error("{step}: malformed response: {message}")]
    MalformedResponse { step: Step, message: String },

    #[error("{step}: platform returned {status}: {message}")]
    Api {
        step: Step,
        status: StatusCode,
        message: String,
    },

    #[error("{step}: invalid request: {message}")]
    InvalidRequest { step: Step, message: String },
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        " (the account has no projects; pass --create-new to create it)".to_string()
    } else {
        format!(
            " (available projects: {}; pass --create-new to create it)",
            available.join(", ")
        )
    }
}

impl DeployError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the failing step to a client error.
    pub fn from_api(step: Step, err: ApiError) -> Self {
        match err {
            ApiError::Reqwest(e) if e.is_decode() => DeployError::MalformedResponse {
                step,
                message: e.to_string(),
            },
            ApiError::Reqwest(e) => DeployError::Network { step, source: e },
            ApiError::Malformed(message) => DeployError::MalformedResponse { step, message },
            ApiError::Unauthorized(status, message) => DeployError::Auth {
                step,
                status,
                message,
            },
            ApiError::HttpStatus(status, message) | ApiError::Rejected(status, message)
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                DeployError::Auth {
                    step,
                    status,
                    message,
                }
            }
            ApiError::HttpStatus(status, body) | ApiError::Rejected(status, body)
                if step == Step::Upload =>
            {
                DeployError::UploadFailed { status, body }
            }
            ApiError::HttpStatus(status, message) | ApiError::Rejected(status, message) => {
                DeployError::Api {
                    step,
                    status,
                    message,
                }
            }
            other @ (ApiError::UrlParse(_)
            | ApiError::InvalidBaseUrl(_)
            | ApiError::InvalidHeader(_)
            | ApiError::Encode(_)) => DeployError::InvalidRequest {
                step,
                message: other.to_string(),
            },
        }
    }

    /// The step that failed, when the error belongs to one.
    pub fn step(&self) -> Option<Step> {
        match self {
            DeployError::ClientSetup(_) => None,
            DeployError::ProjectNotFound { .. } => Some(Step::EnsureProject),
            DeployError::DirectoryNotFound(_) | DeployError::Io { .. } => {
                Some(Step::BuildManifest)
            }
            DeployError::UploadFailed { .. } => Some(Step::Upload),
            DeployError::DeploymentTimeout { .. } | DeployError::DeploymentFailed { .. } => {
                Some(Step::AwaitCompletion)
            }
            DeployError::Auth { step, .. }
            | DeployError::Network { step, .. }
            | DeployError::MalformedResponse { step, .. }
            | DeployError::Api { step, .. }
            | DeployError::InvalidRequest { step, .. } => Some(*step),
        }
    }
}
