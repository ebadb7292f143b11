pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

use pages_deploy::config::DEFAULT_API_URL;

use super::ops::Deploy;

#[derive(Parser, Debug)]
#[command(name = "pages-deploy", version)]
#[command(about = "Deploy a directory of static files to Cloudflare Pages")]
pub struct Args {
    #[command(flatten)]
    pub deploy: Deploy,

    /// Platform API root
    #[arg(long, env = "PAGES_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Also write daily-rolled log files to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
