use calendar_digest::error::{Error, EXIT_OK};
use calendar_digest::startup::{self, Pipeline};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    if let Err(e) = startup::init_logging() {
        return report_failure(e);
    }

    info!("Starting calendar digest");

    // Configuration errors stop the run before any other work
    let config = match startup::load_config() {
        Ok(config) => config,
        Err(e) => return report_failure(e),
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => return report_failure(e),
    };

    match pipeline.run().await {
        Ok(delivery) => {
            println!("Posted. HTTP {}", delivery.status.as_u16());
            ExitCode::from(EXIT_OK)
        }
        Err(e) => report_failure(e),
    }
}

/// Print the error to stderr and turn it into the process exit code
fn report_failure(err: Error) -> ExitCode {
    let code = err.exit_code();
    match err {
        Error::WebhookStatus { status, body } => {
            eprintln!("Webhook failed: HTTP {}\n{}", status.as_u16(), body);
        }
        other => eprintln!("{:?}", miette::Report::new(other)),
    }
    ExitCode::from(code)
}
