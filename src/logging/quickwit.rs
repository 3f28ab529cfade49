//! A `tracing` layer that ships selected events to Quickwit.
//!
//! Events are picked by the value of a marker field (e.g. `task = "http_request"`), each marker
//! value is routed to its own index. Events are buffered per index and sent as NDJSON once a
//! buffer reaches the batch size. Delivery is best effort: nothing here may block or fail the
//! code that emitted the event.

use crate::logging::consts::{DEFAULT_LOGGING_BUFFER_SIZE, QUICKWIT_LOGGING_CHANNEL_CAPACITY};
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use tokio::sync::mpsc;
use tokio::task;
use tracing::field::{Field, Visit};
use tracing_core::Event;
use tracing_core::Subscriber;
use tracing_subscriber::layer::Context as TracingContext;
use tracing_subscriber::Layer;
use url::Url;

pub struct QuickwitLoggingLayerBuilder {
    quickwit_url: Url,
    marker_field: String,
    marker_to_index: HashMap<String, String>,
    batch_size: usize,
}

impl QuickwitLoggingLayerBuilder {
    pub fn new(quickwit_url: Url) -> Self {
        Self {
            quickwit_url,
            marker_field: String::new(),
            marker_to_index: HashMap::new(),
            batch_size: DEFAULT_LOGGING_BUFFER_SIZE,
        }
    }

    pub fn marker_field(mut self, field: &str) -> Self {
        self.marker_field = field.to_string();
        self
    }

    pub fn map_marker_to_index(mut self, marker_value: &str, index_id: &str) -> Self {
        self.marker_to_index
            .insert(marker_value.to_string(), index_id.to_string());
        self
    }

    /// Must be called from within a Tokio runtime: the shipping task is spawned here.
    pub fn build(self) -> QuickwitLoggingLayer {
        let (sender, receiver) = mpsc::channel(QUICKWIT_LOGGING_CHANNEL_CAPACITY);
        let shipper = QuickwitShipper {
            http_client: Client::new(),
            quickwit_url: self.quickwit_url,
            batch_size: self.batch_size,
        };
        task::spawn(shipper.run(receiver));
        QuickwitLoggingLayer {
            sender,
            marker_field: self.marker_field,
            marker_to_index: self.marker_to_index,
        }
    }
}

pub struct QuickwitLoggingLayer {
    sender: mpsc::Sender<QuickwitLogMessage>,
    marker_field: String,
    marker_to_index: HashMap<String, String>,
}

impl QuickwitLoggingLayer {
    fn index_for(&self, event: &Event<'_>) -> Option<String> {
        let mut visitor = MarkerFieldVisitor::new(&self.marker_field);
        event.record(&mut visitor);
        visitor
            .marker_value
            .and_then(|value| self.marker_to_index.get(&value).cloned())
    }
}

impl<S: Subscriber> Layer<S> for QuickwitLoggingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: TracingContext<'_, S>) {
        if let Some(index_id) = self.index_for(event) {
            let mut visitor = LogVisitor::new();
            event.record(&mut visitor);
            // Dropped when the channel is full.
            let _ = self.sender.try_send(QuickwitLogMessage {
                index_id,
                log: visitor.log,
            });
        }
    }
}

struct QuickwitShipper {
    http_client: Client,
    quickwit_url: Url,
    batch_size: usize,
}

impl QuickwitShipper {
    async fn run(self, mut receiver: mpsc::Receiver<QuickwitLogMessage>) {
        let mut buffers: HashMap<String, Vec<serde_json::Map<String, serde_json::Value>>> =
            HashMap::new();
        while let Some(QuickwitLogMessage { index_id, log }) = receiver.recv().await {
            let buffer = buffers
                .entry(index_id.clone())
                .or_insert_with(|| Vec::with_capacity(self.batch_size));
            buffer.push(log);
            if buffer.len() >= self.batch_size {
                let batch = std::mem::take(buffer);
                self.ship(&index_id, &batch).await;
            }
        }
        for (index_id, batch) in buffers {
            if !batch.is_empty() {
                self.ship(&index_id, &batch).await;
            }
        }
    }

    async fn ship(&self, index_id: &str, batch: &[serde_json::Map<String, serde_json::Value>]) {
        let mut ndjson_body = Vec::new();
        for log in batch {
            if let Err(err) = serialize_to_ndjson(&mut ndjson_body, log) {
                eprintln!("Failed to serialize a log line for `{index_id}`: {err}");
                return;
            }
        }
        let ingest_url = format!("{}api/v1/{}/ingest", self.quickwit_url, index_id);
        let result = self
            .http_client
            .post(ingest_url)
            .body(ndjson_body)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        // Reporting through `tracing` here would feed the failure back into this layer.
        if let Err(err) = result {
            eprintln!(
                "Failed to ship {} log lines to Quickwit index `{index_id}`: {err}",
                batch.len()
            );
        }
    }
}

struct MarkerFieldVisitor {
    marker_field: String,
    marker_value: Option<String>,
}

impl MarkerFieldVisitor {
    fn new(marker_field: &str) -> Self {
        Self {
            marker_field: marker_field.to_string(),
            marker_value: None,
        }
    }
}

impl Visit for MarkerFieldVisitor {
    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == self.marker_field {
            self.marker_value = Some(value.to_string());
        }
    }
}

struct LogVisitor {
    log: serde_json::Map<String, serde_json::Value>,
}

impl LogVisitor {
    fn new() -> Self {
        Self {
            log: serde_json::Map::new(),
        }
    }
}

impl Visit for LogVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.log.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.log.insert(field.name().to_string(), value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.log.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.log.insert(field.name().to_string(), value.into());
    }

    // Quickwit stores integers as 64 bit, saturate instead of wrapping.
    fn record_u128(&mut self, field: &Field, value: u128) {
        let value = u64::try_from(value).unwrap_or(u64::MAX);
        self.log.insert(field.name().to_string(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.log
            .insert(field.name().to_string(), format!("{:?}", value).into());
    }
}

#[derive(Debug, Serialize)]
struct QuickwitLogMessage {
    index_id: String,
    log: serde_json::Map<String, serde_json::Value>,
}

fn serialize_to_ndjson<W, V>(mut writer: W, value: &V) -> io::Result<()>
where
    W: io::Write,
    V: ?Sized + Serialize,
{
    serde_json::to_writer(&mut writer, value)?;
    writer.write_all(b"\n")
}
