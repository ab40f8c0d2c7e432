// Export components
pub mod calendar_source;
pub mod digest;
pub mod webhook;

// Re-export the pieces the pipeline wires together
pub use calendar_source::{CalendarEvent, CommandEventSource, EventBatch, EventSource};
pub use digest::build_digest;
pub use webhook::{Delivery, WebhookNotifier};
