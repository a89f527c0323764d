//! HTTP agent gateway client.
//!
//! Implements `AgentGateway` from threadline-core against a remote agent
//! service: one POST per utterance, the reply arriving as an SSE stream of
//! message-shaped fragments terminated by a `[DONE]` sentinel. Each
//! `data:` payload passes through the fragment normalizer; unrecognized
//! shapes are dropped here, at the boundary.
//!
//! No timeout is imposed and nothing is retried: a hung agent hangs the
//! stream (callers apply their own timeouts), and any failure surfaces
//! exactly once as a stream error.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use threadline_core::agent::gateway::{AgentGateway, FragmentStream};
use threadline_types::error::GatewayError;

use super::fragment::parse_fragment;

/// HTTP/SSE implementation of `AgentGateway`.
pub struct HttpAgentGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpAgentGateway {
    /// Create a gateway client for the agent service at `base_url`.
    ///
    /// The key is wrapped in [`SecretString`] immediately so it never
    /// shows up in debug output past this point.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.map(SecretString::from),
        }
    }

    fn stream_url(&self) -> String {
        format!("{}/agent/stream", self.base_url.trim_end_matches('/'))
    }
}

impl AgentGateway for HttpAgentGateway {
    fn stream_reply(&self, session_key: &str, utterance: &str) -> FragmentStream {
        let mut request = self.http.post(self.stream_url()).json(&json!({
            "session": session_key,
            "message": utterance,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let session = session_key.to_string();

        Box::pin(async_stream::stream! {
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(GatewayError::Connect(e.to_string()));
                    return;
                }
            };
            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(e) => {
                    yield Err(GatewayError::Connect(e.to_string()));
                    return;
                }
            };

            debug!(session = %session, "agent stream opened");

            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data == "[DONE]" {
                            break;
                        }
                        let value: serde_json::Value = match serde_json::from_str(&event.data) {
                            Ok(value) => value,
                            Err(e) => {
                                yield Err(GatewayError::Deserialization(e.to_string()));
                                return;
                            }
                        };
                        if let Some(fragment) = parse_fragment(&value) {
                            yield Ok(fragment);
                        }
                    }
                    Err(e) => {
                        yield Err(GatewayError::Stream(e.to_string()));
                        return;
                    }
                }
            }

            debug!(session = %session, "agent stream ended");
        })
    }
}
