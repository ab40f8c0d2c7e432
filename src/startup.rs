use crate::components::{
    build_digest, CommandEventSource, Delivery, EventSource, WebhookNotifier,
};
use crate::config::Config;
use crate::error::{other_error, DigestResult};
use crate::utils::time::ReferenceZone;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration.
///
/// Logs go to stderr; stdout is kept for the confirmation line.
pub fn init_logging() -> DigestResult<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper_util=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the configuration from the env file and environment
pub fn load_config() -> DigestResult<Config> {
    match Config::load() {
        Ok(config) => {
            info!("Loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Fetch, format and post: one run of the digest
pub struct Pipeline {
    source: Box<dyn EventSource>,
    notifier: WebhookNotifier,
    zone: ReferenceZone,
}

impl Pipeline {
    /// Assemble a pipeline from its parts
    pub fn new<S: EventSource + 'static>(
        source: S,
        notifier: WebhookNotifier,
        zone: ReferenceZone,
    ) -> Self {
        Self {
            source: Box::new(source),
            notifier,
            zone,
        }
    }

    /// Assemble the production pipeline described by the configuration
    pub fn from_config(config: &Config) -> DigestResult<Self> {
        Ok(Self::new(
            CommandEventSource::from_config(config),
            WebhookNotifier::new(&config.webhook)?,
            config.zone.clone(),
        ))
    }

    /// Run every stage in order; the first failure ends the run
    pub async fn run(&self) -> DigestResult<Delivery> {
        let events = self.source.fetch_events().await?;
        info!(
            "Fetched {} events from {} source",
            events.len(),
            self.source.name()
        );

        let digest = build_digest(&events, &self.zone);

        self.notifier.post(&digest).await
    }
}

/// Build the configuration from `lookup` and run the pipeline it describes
pub async fn run<F>(lookup: F) -> DigestResult<Delivery>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    Pipeline::from_config(&config)?.run().await
}
