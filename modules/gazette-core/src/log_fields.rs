//! Typed `additional_data` payload for `ScrapingLog` entries (§4.6).
//!
//! Known keys serialize as typed JSON; anything else is preserved verbatim
//! through the `extra` catch-all so unrecognized keys survive round-trips.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LogFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "http.status", skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(rename = "http.latency_ms", skip_serializing_if = "Option::is_none")]
    pub http_latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_to_process: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogFields {
    pub fn lifecycle(event_name: &'static str) -> Self {
        Self { event_type: Some("lifecycle"), event_name: Some(event_name), ..Default::default() }
    }

    pub fn http(event_name: &'static str) -> Self {
        Self { event_type: Some("http"), event_name: Some(event_name), ..Default::default() }
    }

    pub fn extraction(event_name: &'static str) -> Self {
        Self { event_type: Some("extraction"), event_name: Some(event_name), ..Default::default() }
    }

    pub fn error(event_name: &'static str) -> Self {
        Self { event_type: Some("error"), event_name: Some(event_name), ..Default::default() }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_latency_ms(mut self, ms: u64) -> Self {
        self.http_latency_ms = Some(ms);
        self
    }

    pub fn with_error(mut self, error_type: &'static str, message: impl Into<String>) -> Self {
        self.error_type = Some(error_type);
        self.error_message = Some(message.into());
        self
    }

    pub fn with_language(mut self, language: &'static str) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_content_length(mut self, len: usize) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_serialize_with_documented_names() {
        let fields = LogFields::http("rss_parsed").with_http_status(200).with_latency_ms(42);
        let json = fields.to_json();
        assert_eq!(json["event_type"], "http");
        assert_eq!(json["event_name"], "rss_parsed");
        assert_eq!(json["http.status"], 200);
        assert_eq!(json["http.latency_ms"], 42);
    }

    #[test]
    fn unrecognized_keys_round_trip_via_extra() {
        let mut fields = LogFields::lifecycle("job_started");
        fields.extra.insert("memory_usage_mb".into(), Value::from(128));
        let json = fields.to_json();
        assert_eq!(json["memory_usage_mb"], 128);
    }

    #[test]
    fn absent_fields_are_omitted_not_null() {
        let fields = LogFields::lifecycle("job_created");
        let json = fields.to_json();
        assert!(json.get("url").is_none());
    }
}
