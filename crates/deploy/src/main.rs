// CLI modules
mod cli;

use std::process::ExitCode;

use cli::args::{Args, Parser};
use cli::op::{Op, OpContext};
use pages_deploy::logging::{init_logging, LogConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Guards flush buffered log lines when main returns
    let _guards = init_logging(&LogConfig {
        level: args.log_level,
        log_dir: args.log_dir.clone(),
    });

    let ctx = OpContext::new(args.api_url.clone());

    match args.deploy.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(step = ?e.step(), error = ?e, "deployment failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
