use std::process::ExitCode;

use clap::Parser;
use design_lens::cli::{self, Cli, CliError};
use design_lens::logging::{LogLevel, init_logging};
use design_lens::{AnalysisClient, AnalysisConfig};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(LogLevel::Warn);
    let args = Cli::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli) -> Result<(), CliError> {
    let config = AnalysisConfig::from_env()?;
    let client = AnalysisClient::new(config)?;
    cli::run(&client, &args.image_path, |line| println!("{}", line)).await?;
    Ok(())
}
