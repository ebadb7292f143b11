use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use pages_deploy::prelude::*;

#[derive(Args, Clone)]
pub struct Deploy {
    /// API token with Pages edit permission
    #[arg(short = 't', long, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Account ID that owns the project
    #[arg(short = 'a', long, env = "CLOUDFLARE_ACCOUNT_ID")]
    pub account: String,

    /// Pages project name
    #[arg(short = 'p', long)]
    pub project: String,

    /// Directory to deploy
    #[arg(short = 'd', long)]
    pub directory: PathBuf,

    /// Create the project if it doesn't exist
    #[arg(short = 'c', long)]
    pub create_new: bool,

    /// Deploy to a new project named <project>-<timestamp>
    #[arg(short = 'u', long)]
    pub unique: bool,

    /// Seconds to wait for the deployment to finish
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Seconds between deployment status checks
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,
}

impl fmt::Debug for Deploy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deploy")
            .field("token", &"[redacted]")
            .field("account", &self.account)
            .field("project", &self.project)
            .field("directory", &self.directory)
            .field("create_new", &self.create_new)
            .field("unique", &self.unique)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Deploy {
    pub fn config(&self, ctx: &crate::cli::op::OpContext) -> DeployConfig {
        DeployConfig {
            credentials: Credentials::new(&self.token, &self.account),
            api_url: ctx.api_url.clone(),
            project: self.project.clone(),
            directory: self.directory.clone(),
            create_new: self.create_new,
            unique: self.unique,
            poll: PollSettings {
                timeout: Duration::from_secs(self.timeout),
                interval: Duration::from_secs(self.poll_interval),
            },
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Deploy {
    type Error = DeployError;
    type Output = DeploymentOutcome;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = self.config(ctx);
        tracing::info!(
            project = %config.project,
            account = %config.credentials.account_id(),
            api = %config.api_url,
            "starting deployment"
        );

        let client = DeploymentClient::from_config(config)?;
        client.deploy().await
    }
}
