//! Recording transport for tests
//!
//! Replies with queued responses in order and keeps every request it saw.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiResponse, Transport};

struct QueuedResponse {
    response: ApiResponse,
    delay: Duration,
}

#[derive(Default)]
struct Recording {
    responses: VecDeque<QueuedResponse>,
    requests: Vec<ApiRequest>,
}

/// In-memory [`Transport`] with scripted responses
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_after(Duration::ZERO, status, body)
    }

    /// Queue a JSON response delivered after `delay`
    pub fn respond_after(&self, delay: Duration, status: u16, body: Value) -> &Self {
        self.push(delay, status, body.to_string())
    }

    /// Queue a response with an empty body
    pub fn respond_empty(&self, status: u16) -> &Self {
        self.push(Duration::ZERO, status, String::new())
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    fn push(&self, delay: Duration, status: u16, body: String) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(QueuedResponse {
                response: ApiResponse { status, body },
                delay,
            });
        self
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let queued = {
            let mut recording = self.inner.lock().unwrap();
            recording.requests.push(request);
            recording.responses.pop_front()
        };

        match queued {
            Some(QueuedResponse { response, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Ok(ApiResponse {
                status: 500,
                body: "no response queued".to_string(),
            }),
        }
    }
}
