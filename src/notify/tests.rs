//! Behavioural tests for the notifier against recording transports

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use jiff::Timestamp;
use proptest::prelude::*;
use serde_json::{Value, json};

use super::*;
use crate::error::{AppError, AppResult};
use crate::logger::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Debug,
    Error,
}

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<(Level, String, bool)>>,
}

impl RecordingSink {
    fn entries_at(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .map(|(_, message, _)| message.clone())
            .collect()
    }

    fn stack_trace_requested(&self) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(level, _, trace)| *level == Level::Error && *trace)
    }
}

impl LogSink for RecordingSink {
    fn info(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((Level::Info, message.to_string(), false));
    }

    fn debug(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((Level::Debug, message.to_string(), false));
    }

    fn error(&self, message: &str, with_stack_trace: bool) {
        self.entries
            .lock()
            .unwrap()
            .push((Level::Error, message.to_string(), with_stack_trace));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Published {
    topic_id: String,
    subject: String,
    message: String,
}

/// Records every publish; fails every call when `fail` is set
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<Published>>,
    fail: bool,
}

impl RecordingPublisher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicPublisher for RecordingPublisher {
    async fn publish(&self, topic_id: &str, subject: &str, message: &str) -> AppResult<PublishResponse> {
        self.published.lock().unwrap().push(Published {
            topic_id: topic_id.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });

        if self.fail {
            return Err(AppError::Rejected {
                status: 404,
                code: "NotFound".to_string(),
                message: "Topic does not exist".to_string(),
            });
        }

        Ok(PublishResponse {
            message_id: format!("msg-{}", self.published.lock().unwrap().len()),
            request_id: Some("req-1".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Records every request and answers with a fixed status
struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    outcome: Result<u16, String>,
}

impl RecordingTransport {
    fn answering(status: u16) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Ok(status),
        }
    }

    fn unreachable(reason: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Err(reason.to_string()),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.outcome {
            Ok(status) => Ok(HttpResponse {
                status: *status,
                body: b"{\"ok\":true}".to_vec(),
            }),
            Err(reason) => Err(AppError::transport(
                "metrics POST",
                anyhow::anyhow!("{}", reason),
            )),
        }
    }
}

struct Harness {
    sink: Arc<RecordingSink>,
    publisher: Arc<RecordingPublisher>,
    transport: Arc<RecordingTransport>,
    notifier: Notifier,
}

fn harness(publisher: RecordingPublisher, transport: RecordingTransport) -> Harness {
    let sink = Arc::new(RecordingSink::default());
    let publisher = Arc::new(publisher);
    let transport = Arc::new(transport);
    let notifier = Notifier::new(sink.clone(), publisher.clone(), transport.clone());
    Harness {
        sink,
        publisher,
        transport,
        notifier,
    }
}

fn default_harness() -> Harness {
    harness(RecordingPublisher::default(), RecordingTransport::answering(200))
}

fn decimal(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

// ============================================================================
// notify_customer
// ============================================================================

#[tokio::test]
async fn test_notify_customer_publishes_subject_and_pretty_body() {
    let h = default_harness();

    let response = h
        .notifier
        .notify_customer("arn:x", &json!({"status": "OK"}))
        .await;

    assert_eq!(
        response,
        Some(PublishResponse {
            message_id: "msg-1".to_string(),
            request_id: Some("req-1".to_string()),
        })
    );
    assert_eq!(
        h.publisher.published(),
        vec![Published {
            topic_id: "arn:x".to_string(),
            subject: "EFS Backup Status".to_string(),
            message: "{\n    \"status\": \"OK\"\n}".to_string(),
        }]
    );

    let infos = h.sink.entries_at(Level::Info);
    assert_eq!(infos.len(), 1);
    assert!(infos[0].contains("MessageId=msg-1"));
    assert!(h.sink.entries_at(Level::Error).is_empty());
}

#[tokio::test]
async fn test_notify_customer_sorts_nested_keys() {
    let h = default_harness();
    let message = json!({
        "summary": {"status": "OK", "duration": 12},
        "backup_id": "b-1",
    });

    h.notifier.notify_customer("arn:x", &message).await;

    let body = &h.publisher.published()[0].message;
    assert_eq!(
        body,
        "{\n    \"backup_id\": \"b-1\",\n    \"summary\": {\n        \"duration\": 12,\n        \"status\": \"OK\"\n    }\n}"
    );
}

#[tokio::test]
async fn test_notify_customer_renders_decimals_as_numbers() {
    let h = default_harness();
    let message = Payload::mapping()
        .with("files_copied", decimal("1200"))
        .with("size_gb", decimal("10.25"));

    h.notifier.notify_customer("arn:x", &message).await;

    let body = &h.publisher.published()[0].message;
    assert!(body.contains("\"files_copied\": 1200,"));
    assert!(body.contains("\"size_gb\": 10.25"));
}

#[tokio::test]
async fn test_notify_customer_keeps_large_whole_numbers_exact() {
    let h = default_harness();
    let message = Payload::mapping()
        .with("big", decimal("1e29"))
        .with("neg_big", decimal("-99999999999999999999"))
        .with("ratio", decimal("0.1000000000000000055511151231257827"));

    h.notifier.notify_customer("arn:x", &message).await;

    assert_eq!(
        h.publisher.published()[0].message,
        "{\n    \"big\": 100000000000000000000000000000,\n    \"neg_big\": -99999999999999999999,\n    \"ratio\": 0.1\n}"
    );
}

#[tokio::test]
async fn test_notify_customer_failure_is_swallowed_and_logged_once() {
    let h = harness(RecordingPublisher::failing(), RecordingTransport::answering(200));

    let response = h
        .notifier
        .notify_customer("arn:aws:sns:us-east-1:123456789012:gone", &json!({"status": "OK"}))
        .await;

    assert!(response.is_none());
    let errors = h.sink.entries_at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("notify_customer"));
    assert!(errors[0].contains("Topic does not exist"));
    assert!(h.sink.stack_trace_requested());
    assert!(h.sink.entries_at(Level::Info).is_empty());
}

#[tokio::test]
async fn test_notify_customer_serialization_failure_never_publishes() {
    let h = default_harness();
    let mut message = std::collections::HashMap::new();
    message.insert(vec![1u8], "non-string key");

    let response = h.notifier.notify_customer("arn:x", &message).await;

    assert!(response.is_none());
    assert!(h.publisher.published().is_empty());
    let errors = h.sink.entries_at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Serialization failed"));
}

// ============================================================================
// send_metrics
// ============================================================================

#[tokio::test]
async fn test_send_metrics_posts_envelope_once() {
    let h = default_harness();

    let status = h
        .notifier
        .send_metrics("SO001", "uuid-1", &json!({"count": 5}), "https://example.com/m")
        .await;

    assert_eq!(status, Some(200));

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "https://example.com/m");

    let body = String::from_utf8(request.body.clone()).unwrap();
    assert!(body.contains("\"Solution\": \"SO001\""));
    assert!(body.contains("\"UUID\": \"uuid-1\""));

    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["Data"], json!({"count": 5}));
    let timestamp = parsed["TimeStamp"].as_str().unwrap();
    assert!(timestamp.parse::<Timestamp>().is_ok());

    assert_eq!(
        request.header("content-type"),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(
        request.header("content-length"),
        Some(request.body.len().to_string().as_str())
    );
}

#[tokio::test]
async fn test_send_metrics_logs_status_and_body() {
    let h = default_harness();

    h.notifier
        .send_metrics("SO001", "uuid-1", &json!({"count": 5}), "https://example.com/m")
        .await;

    assert_eq!(h.sink.entries_at(Level::Info), vec!["Response Code: 200".to_string()]);
    assert_eq!(
        h.sink.entries_at(Level::Debug),
        vec!["Response Body: {\"ok\":true}".to_string()]
    );
}

#[tokio::test]
async fn test_send_metrics_returns_error_status_unchanged() {
    let h = harness(RecordingPublisher::default(), RecordingTransport::answering(503));

    let status = h
        .notifier
        .send_metrics("SO001", "uuid-1", &json!({}), "https://example.com/m")
        .await;

    assert_eq!(status, Some(503));
    assert!(h.sink.entries_at(Level::Error).is_empty());
}

#[tokio::test]
async fn test_send_metrics_transport_failure_is_swallowed() {
    let h = harness(
        RecordingPublisher::default(),
        RecordingTransport::unreachable("dns error: no such host"),
    );

    let status = h
        .notifier
        .send_metrics("SO001", "uuid-1", &json!({"count": 5}), "https://nowhere.invalid/m")
        .await;

    assert!(status.is_none());
    assert_eq!(h.transport.requests().len(), 1);
    let errors = h.sink.entries_at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("send_metrics"));
    assert!(errors[0].contains("no such host"));
    assert!(h.sink.entries_at(Level::Info).is_empty());
}

#[tokio::test]
async fn test_operations_are_independent() {
    let h = harness(
        RecordingPublisher::failing(),
        RecordingTransport::answering(200),
    );

    assert!(h.notifier.notify_customer("arn:x", &json!({})).await.is_none());
    assert_eq!(
        h.notifier
            .send_metrics("SO001", "uuid-1", &json!({}), "https://example.com/m")
            .await,
        Some(200)
    );
    assert_eq!(h.sink.entries_at(Level::Error).len(), 1);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 éü]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The published body parses back to exactly the input message
    #[test]
    fn prop_published_body_preserves_structure(message in arb_json()) {
        let h = default_harness();
        runtime().block_on(h.notifier.notify_customer("arn:x", &message));

        let published = h.publisher.published();
        prop_assert_eq!(published.len(), 1);
        let parsed: Value = serde_json::from_str(&published[0].message).unwrap();
        prop_assert_eq!(parsed, message);
    }

    /// Integral decimals keep every digit; fractional ones become the nearest float
    #[test]
    fn prop_decimal_rendering(digits in "-?[1-9][0-9]{0,45}", scale in -40i64..12) {
        let value = decimal(&format!("{}E{}", digits, -scale));
        let rendered = encoding::to_pretty_json(&Payload::Decimal(value.clone())).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();

        if value.with_scale(0) == value {
            let expected = if scale <= 0 {
                format!("{}{}", digits, "0".repeat(-scale as usize))
            } else {
                digits[..digits.len() - scale as usize].to_string()
            };
            prop_assert_eq!(rendered, expected);
        } else {
            prop_assert!(parsed.is_f64());
            let nearest: f64 = value.to_string().parse().unwrap();
            prop_assert_eq!(parsed.as_f64(), Some(nearest));
        }
    }

    /// content-length always equals the UTF-8 byte length of the body
    #[test]
    fn prop_content_length_matches_body(
        solution in "[A-Z0-9]{1,8}",
        instance in "[a-zé🚀-]{1,12}",
        data in arb_json(),
    ) {
        let h = default_harness();
        runtime().block_on(h.notifier.send_metrics(&solution, &instance, &data, "https://example.com/m"));

        let requests = h.transport.requests();
        prop_assert_eq!(requests.len(), 1);
        let declared: usize = requests[0].header("content-length").unwrap().parse().unwrap();
        prop_assert_eq!(declared, requests[0].body.len());

        let parsed: Value = serde_json::from_slice(&requests[0].body).unwrap();
        prop_assert_eq!(&parsed["Solution"], &json!(solution));
        prop_assert_eq!(&parsed["UUID"], &json!(instance));
        prop_assert_eq!(&parsed["Data"], &data);
    }
}
