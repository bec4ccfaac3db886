//! Newline-delimited JSON over stdin/stdout, standing in for the pub/sub broker.
//!
//! Each line is an envelope `{"topic": "<scoped topic>", "payload": <json>}`.

use std::io::{self, BufRead, Write};

use futures_lite::future::block_on;
use jove_core::utils::{Event, Publication, Publish, TopicScope, EVENT_CHANNEL};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::shutdown::request_shutdown;

#[derive(Debug, Deserialize)]
struct Inbound {
    topic: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Outbound<'a> {
    topic: &'a str,
    payload: serde_json::Value,
}

/// Prints publications to stdout.
pub struct StdoutPublisher {
    scope: TopicScope,
}

impl StdoutPublisher {
    pub fn new(scope: TopicScope) -> Self {
        Self { scope }
    }
}

impl Publish for StdoutPublisher {
    fn publish(
        &mut self,
        publication: Publication,
    ) {
        let (topic, bytes) = match self.scope.encode(&publication) {
            Ok(encoded) => encoded,
            Err(error) => {
                error!(%error, ?publication, "failed to encode publication");
                return;
            }
        };
        let payload = match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(error) => {
                error!(%error, "publication payload is not JSON");
                return;
            }
        };
        let line = match serde_json::to_string(&Outbound { topic: &topic, payload }) {
            Ok(line) => line,
            Err(error) => {
                error!(%error, "failed to encode envelope");
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(error) = writeln!(stdout, "{line}").and_then(|_| stdout.flush()) {
            warn!(%error, %topic, "publication dropped");
        }
    }
}

fn decode_line(
    scope: &TopicScope,
    line: &str,
) -> Option<Event> {
    let envelope: Inbound = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(error) => {
            error!(%error, "invalid envelope");
            return None;
        }
    };
    let bytes = match serde_json::to_vec(&envelope.payload) {
        Ok(bytes) => bytes,
        Err(error) => {
            error!(%error, "invalid payload");
            return None;
        }
    };
    match scope.decode(&envelope.topic, &bytes) {
        Ok(event) => Some(event),
        Err(error) => {
            error!(%error, topic = %envelope.topic, "dropping inbound message");
            None
        }
    }
}

/// Read envelopes on a dedicated thread and queue them for the dispatcher.
///
/// End of input queues a shutdown.
pub fn spawn_reader(scope: TopicScope) -> io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let sender = EVENT_CHANNEL.sender();
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(error) => {
                        error!(%error, "stdin read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(event) = decode_line(&scope, &line) {
                    block_on(sender.send(event));
                }
            }
            info!("input closed, requesting shutdown");
            request_shutdown(sender);
        })
}
