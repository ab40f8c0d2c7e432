use async_trait::async_trait;
use calendar_digest::components::calendar_source::{
    CalendarEvent, CommandEventSource, EventBatch, EventSource, StaticEventSource,
};
use calendar_digest::components::webhook::WebhookNotifier;
use calendar_digest::config::{WebhookConfig, CALENDAR_COMMAND_VAR, WEBHOOK_URL_VAR};
use calendar_digest::error::{source_error, DigestResult, Error};
use calendar_digest::startup::{self, Pipeline};
use calendar_digest::utils::time::ReferenceZone;
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock source that counts how often it is asked for events
#[derive(Clone, Default)]
struct CountingEventSource {
    calls: Arc<AtomicUsize>,
    events: EventBatch,
    fail: bool,
}

#[async_trait]
impl EventSource for CountingEventSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch_events(&self) -> DigestResult<EventBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(source_error("mock producer failed"));
        }
        Ok(self.events.clone())
    }
}

fn notifier_for(server: &MockServer) -> WebhookNotifier {
    WebhookNotifier::new(&WebhookConfig {
        url: Url::parse(&format!("{}/hook", server.uri())).unwrap(),
        username: None,
    })
    .unwrap()
}

fn lookup_from(pairs: Vec<(&str, String)>) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[tokio::test]
async fn test_pipeline_posts_formatted_digest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "content": "Tue 12/17 9:00 AM–9:30 AM ET: Standup @ Room A\nAll day: (No title)"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let events = vec![
        CalendarEvent::timed("Standup", "2024-12-17T14:00:00Z", "2024-12-17T14:30:00Z")
            .with_location("Room A"),
        CalendarEvent {
            all_day: Some(true),
            ..Default::default()
        },
    ];
    let pipeline = Pipeline::new(
        StaticEventSource::new(events),
        notifier_for(&server),
        ReferenceZone::default(),
    );

    let delivery = pipeline.run().await.unwrap();
    assert_eq!(delivery.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_pipeline_posts_fallback_for_empty_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "content": "No events today." })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let source = CountingEventSource::default();
    let calls = Arc::clone(&source.calls);
    let pipeline = Pipeline::new(source, notifier_for(&server), ReferenceZone::default());

    let delivery = pipeline.run().await.unwrap();
    assert_eq!(delivery.status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_source_failure_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let source = CountingEventSource {
        fail: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(source, notifier_for(&server), ReferenceZone::default());

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, Error::Source(_)));
}

#[tokio::test]
async fn test_webhook_failure_ends_run_with_delivery_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(
        StaticEventSource::default(),
        notifier_for(&server),
        ReferenceZone::default(),
    );

    let err = pipeline.run().await.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(matches!(err, Error::WebhookStatus { ref body, .. } if body == "internal error"));
}

#[tokio::test]
async fn test_pipeline_runs_command_producer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "content": "All day: Holiday @ Office" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let source = CommandEventSource::new("sh", Duration::from_secs(10))
        .arg("-c")
        .arg(r#"echo '{"events":[{"title":"Holiday","location":"Office","allDay":true}]}'"#);
    let pipeline = Pipeline::new(source, notifier_for(&server), ReferenceZone::default());

    pipeline.run().await.unwrap();
}

#[tokio::test]
async fn test_run_with_empty_webhook_does_no_work() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    // A missing producer would fail with a source error if it were ever run
    let err = startup::run(lookup_from(vec![
        (WEBHOOK_URL_VAR, "  ".to_string()),
        (CALENDAR_COMMAND_VAR, "./definitely/not/a/calendar".to_string()),
    ]))
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Environment(_)));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_run_reports_missing_producer_as_source_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = startup::run(lookup_from(vec![
        (WEBHOOK_URL_VAR, format!("{}/hook", server.uri())),
        (CALENDAR_COMMAND_VAR, "./definitely/not/a/calendar".to_string()),
    ]))
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Source(_)));
    assert_eq!(err.exit_code(), 3);
}
