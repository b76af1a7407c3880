use std::process::ExitCode;

use design_lens::logging::{LogLevel, init_logging};
use design_lens::{AnalysisClient, AnalysisConfig, ToolServer};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(LogLevel::Info);

    let client = match AnalysisConfig::from_env().and_then(AnalysisClient::new) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Tool server not started");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = ToolServer::new(client).serve_stdio().await {
        tracing::error!(error = %e, "Tool server stopped with an error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
