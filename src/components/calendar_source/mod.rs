mod command;
pub mod models;

pub use command::CommandEventSource;
pub use models::{CalendarEvent, EventBatch, SourceDocument};

use crate::error::{source_error, DigestResult};
use async_trait::async_trait;

/// Anything that can produce the day's events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Fetch the events for this run
    async fn fetch_events(&self) -> DigestResult<EventBatch>;
}

/// Decode the producer's JSON output into an event batch
pub fn parse_source_output(output: &str) -> DigestResult<EventBatch> {
    let document: SourceDocument = serde_json::from_str(output)
        .map_err(|e| source_error(&format!("Calendar output is not valid JSON: {}", e)))?;
    Ok(document.into_batch())
}

/// Event source backed by a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: EventBatch,
}

impl StaticEventSource {
    pub fn new(events: EventBatch) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_events(&self) -> DigestResult<EventBatch> {
        Ok(self.events.clone())
    }
}
