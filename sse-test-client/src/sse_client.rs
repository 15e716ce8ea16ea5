use anyhow::Result;
use domain::GreetingResponse;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Greeting {
    pub greeting: GreetingResponse,
    pub received_at: Instant,
}

pub struct Connection {
    pub label: String,
    greeting_rx: mpsc::UnboundedReceiver<Greeting>,
    _handle: tokio::task::JoinHandle<()>,
}

/// Builds the stream URL for `name`, escaping it as a single path segment.
pub fn stream_url(base_url: &str, name: &str, interval_ms: Option<u64>) -> String {
    let mut url = format!(
        "{}/greetings/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(name)
    );
    if let Some(interval_ms) = interval_ms {
        url.push_str(&format!("?interval_ms={interval_ms}"));
    }
    url
}

impl Connection {
    pub async fn establish(url: &str, label: String) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        // The server never replays, so reconnecting would silently start a new stream
        let client = es::ClientBuilder::for_url(url)?
            .reconnect(es::ReconnectOptions::reconnect(false).build())
            .build();

        let stream_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => {
                        match sse::message::decode_payload(&event.data) {
                            Ok(greeting) => {
                                let greeting = Greeting {
                                    greeting,
                                    received_at: Instant::now(),
                                };
                                if tx.send(greeting).is_err() {
                                    debug!("Greeting receiver dropped for {stream_label}");
                                    break;
                                }
                            }
                            Err(e) => warn!("Undecodable event for {stream_label}: {e}"),
                        }
                    }
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Ignore comments (keep-alive)
                    }
                    Some(Err(e)) => {
                        warn!("SSE error for {stream_label}: {e}");
                        break;
                    }
                    None => {
                        debug!("SSE stream ended for {stream_label}");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            label,
            greeting_rx: rx,
            _handle: handle,
        })
    }

    pub async fn next_greeting(&mut self, timeout: Duration) -> Result<Greeting> {
        match tokio::time::timeout(timeout, self.greeting_rx.recv()).await {
            Ok(Some(greeting)) => Ok(greeting),
            Ok(None) => anyhow::bail!("SSE connection closed"),
            Err(_) => anyhow::bail!("Timeout after {timeout:?} waiting for a greeting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_escapes_the_name() {
        assert_eq!(
            stream_url("http://localhost:4000/", "Ada Lovelace", None),
            "http://localhost:4000/greetings/Ada%20Lovelace"
        );
    }

    #[test]
    fn stream_url_carries_the_interval() {
        assert_eq!(
            stream_url("http://localhost:4000", "Ada", Some(250)),
            "http://localhost:4000/greetings/Ada?interval_ms=250"
        );
    }
}
