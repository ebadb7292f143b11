use chrono::{DateTime, Local, TimeZone};

use crate::error::{DeployError, Step};
use crate::platform::Platform;

/// Timestamp appended by `--unique`, second resolution.
pub const UNIQUE_SUFFIX_FORMAT: &str = "%Y%m%d%H%M%S";

/// The project a deployment targets, once its existence is settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub name: String,
    /// Whether this run created the project
    pub created: bool,
}

/// Suffix `base` with the timestamp of `at`, e.g. `docs-20240101120000`.
pub fn unique_name<Tz: TimeZone>(base: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}", base, at.format(UNIQUE_SUFFIX_FORMAT))
}

/// Resolve the target project, creating it when allowed.
///
/// A unique name is fresh by construction, so `unique_suffix` implies creation.
pub async fn ensure_project<P: Platform + ?Sized>(
    platform: &P,
    name: &str,
    create_if_missing: bool,
    unique_suffix: bool,
) -> Result<ProjectRef, DeployError> {
    let name = if unique_suffix {
        let name = unique_name(name, &Local::now());
        tracing::info!(project = %name, "using unique project name");
        name
    } else {
        name.to_string()
    };
    let create_if_missing = create_if_missing || unique_suffix;

    let existing = platform
        .get_project(&name)
        .await
        .map_err(|e| DeployError::from_api(Step::EnsureProject, e))?;

    if let Some(project) = existing {
        tracing::info!(project = %project.name, "found project");
        return Ok(ProjectRef {
            name,
            created: false,
        });
    }

    if !create_if_missing {
        let available = platform
            .list_projects()
            .await
            .map_err(|e| DeployError::from_api(Step::EnsureProject, e))?
            .into_iter()
            .map(|project| project.name)
            .collect();
        return Err(DeployError::ProjectNotFound { name, available });
    }

    tracing::info!(project = %name, "project not found, creating it");
    let project = platform
        .create_project(&name)
        .await
        .map_err(|e| DeployError::from_api(Step::EnsureProject, e))?;
    tracing::info!(project = %project.name, "created project");

    Ok(ProjectRef {
        name,
        created: true,
    })
}
