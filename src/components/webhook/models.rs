use reqwest::StatusCode;
use serde::Serialize;

/// JSON body posted to the webhook
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
}

/// Result of an accepted post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
}
