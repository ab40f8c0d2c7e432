use super::{parse_source_output, EventBatch, EventSource};
use crate::config::Config;
use crate::error::{source_error, DigestResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs an external program and reads its JSON output as the event batch
#[derive(Debug, Clone)]
pub struct CommandEventSource {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl CommandEventSource {
    /// Create a source for the given program, bounded by `timeout`
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Create the source described by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.calendar_command.clone(), config.calendar_timeout)
    }

    /// Append an argument to the invocation.
    ///
    /// The configured producer always runs without arguments; this is the
    /// seam tests use to stand a shell in for it.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run the program and collect its standard output
    async fn run(&self) -> DigestResult<String> {
        let program = self.program.display();

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| source_error(&format!("Failed to run {}: {}", program, e)))?;

        // Dropping the child on timeout kills it
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result
                .map_err(|e| source_error(&format!("Failed to read output of {}: {}", program, e)))?,
            Err(_) => {
                return Err(source_error(&format!(
                    "{} did not finish within {}s",
                    program,
                    self.timeout.as_secs_f32()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            warn!("Calendar producer exited with {}", output.status);
            return Err(source_error(&if stderr.is_empty() {
                format!("{} exited with {}", program, output.status)
            } else {
                format!("{} exited with {}: {}", program, output.status, stderr)
            }));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| source_error(&format!("Output of {} is not UTF-8: {}", program, e)))
    }
}

#[async_trait]
impl EventSource for CommandEventSource {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn fetch_events(&self) -> DigestResult<EventBatch> {
        info!("Running calendar producer {}", self.program.display());

        let stdout = self.run().await?;
        let events = parse_source_output(&stdout)?;

        debug!("Calendar producer returned {} events", events.len());
        Ok(events)
    }
}
