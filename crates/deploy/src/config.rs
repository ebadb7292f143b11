use std::fmt;
use std::fs;
use std::path::PathBuf;

use url::Url;

use crate::deployment::PollSettings;
use crate::error::DeployError;

pub const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";

/// API token plus account identifier. The token never shows up in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    account_id: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            account_id: account_id.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[redacted]")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Everything one run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub credentials: Credentials,
    /// Platform API root, e.g. `https://api.cloudflare.com/client/v4`
    pub api_url: Url,
    pub project: String,
    pub directory: PathBuf,
    /// Create the project when it does not exist
    pub create_new: bool,
    /// Suffix the project name with a timestamp
    pub unique: bool,
    pub poll: PollSettings,
}

impl DeployConfig {
    pub fn new(
        credentials: Credentials,
        project: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            credentials,
            api_url: Url::parse(DEFAULT_API_URL)?,
            project: project.into(),
            directory: directory.into(),
            create_new: false,
            unique: false,
            poll: PollSettings::default(),
        })
    }

    /// Fail fast on a bad directory, before any request is made.
    pub fn validate_directory(&self) -> Result<(), DeployError> {
        match fs::metadata(&self.directory) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            _ => Err(DeployError::DirectoryNotFound(self.directory.clone())),
        }
    }
}
