use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{sleep, timeout_at, Instant};

use crate::error::{DeployError, Step};
use crate::platform::Platform;

/// Default time between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default time to wait for a deployment to finish.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
/// Stand-in for deadlines too far out for the clock to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Queued,
    Building,
    Deploying,
    Success,
    Failure,
}

impl DeploymentStatus {
    /// No further transition happens from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failure)
    }

    /// Parse a flat stage name.
    pub fn from_stage(stage: &str) -> Option<Self> {
        let status = match stage.trim().to_ascii_lowercase().as_str() {
            "queued" | "initialize" => DeploymentStatus::Queued,
            "building" | "build" | "clone_repo" => DeploymentStatus::Building,
            "deploying" | "deploy" => DeploymentStatus::Deploying,
            "success" => DeploymentStatus::Success,
            "failure" | "failed" | "canceled" => DeploymentStatus::Failure,
            _ => return None,
        };
        Some(status)
    }

    /// Parse a `latest_stage` object: the pipeline stage plus its progress.
    pub fn from_latest_stage(name: &str, status: Option<&str>) -> Option<Self> {
        let status = status.map(|s| s.trim().to_ascii_lowercase());
        match status.as_deref() {
            Some("failure") | Some("failed") | Some("canceled") => {
                return Some(DeploymentStatus::Failure)
            }
            Some("success") if name.eq_ignore_ascii_case("deploy") => {
                return Some(DeploymentStatus::Success)
            }
            _ => {}
        }
        Self::from_stage(name)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentStatus::Queued => "queued",
            DeploymentStatus::Building => "building",
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Success => "success",
            DeploymentStatus::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// A deployment as last reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub id: String,
    pub status: DeploymentStatus,
    /// Public URL, once the platform assigns one
    pub url: Option<String>,
    /// Platform-supplied diagnostic for failed deployments
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Poll a deployment until it reaches a terminal status or the timeout elapses.
///
/// Each cycle checks the deadline; sleeps are clamped to the remaining time and
/// a single poll may not run past the deadline by more than one interval.
pub async fn await_completion<P: Platform + ?Sized>(
    platform: &P,
    project: &str,
    deployment_id: &str,
    settings: PollSettings,
) -> Result<DeploymentRecord, DeployError> {
    let deadline = instant_after(Instant::now(), settings.timeout);
    let hard_deadline = instant_after(deadline, settings.interval);
    let mut last_status = DeploymentStatus::Queued;
    let mut polls: u32 = 0;

    loop {
        let poll = platform.get_deployment(project, deployment_id);
        let record = match timeout_at(hard_deadline, poll).await {
            Ok(result) => result.map_err(|e| DeployError::from_api(Step::AwaitCompletion, e))?,
            Err(_) => {
                tracing::warn!(deployment = deployment_id, "status request outlived the deadline");
                return Err(DeployError::DeploymentTimeout {
                    id: deployment_id.to_string(),
                    timeout: settings.timeout,
                    last_status,
                });
            }
        };
        polls += 1;

        if polls == 1 || record.status != last_status {
            tracing::info!(
                deployment = deployment_id,
                status = %record.status,
                polls,
                "deployment status"
            );
        }
        last_status = record.status;

        match record.status {
            DeploymentStatus::Success => return Ok(record),
            DeploymentStatus::Failure => {
                return Err(DeployError::DeploymentFailed {
                    id: record.id,
                    message: record
                        .error_message
                        .unwrap_or_else(|| "the platform reported no diagnostic".to_string()),
                })
            }
            _ => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DeployError::DeploymentTimeout {
                id: deployment_id.to_string(),
                timeout: settings.timeout,
                last_status,
            });
        }
        sleep(settings.interval.min(deadline - now)).await;
    }
}

/// `base + after`, saturating at a far-future instant instead of overflowing.
fn instant_after(base: Instant, after: Duration) -> Instant {
    base.checked_add(after)
        .or_else(|| base.checked_add(FAR_FUTURE.min(after)))
        .unwrap_or(base)
}
