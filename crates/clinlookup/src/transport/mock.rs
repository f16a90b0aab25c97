//! Mock transport for testing.

use std::sync::Mutex;

use crate::error::{ClinError, Result};

use super::Transport;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Failure(String),
}

/// Mock transport that serves canned bodies keyed by URL substring.
///
/// Routes are checked in registration order and the first one whose
/// pattern occurs in the requested URL answers. Unrouted URLs fail like
/// an unreachable host. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Vec<(String, MockResponse)>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a mock transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with `body`.
    pub fn with_response(mut self, pattern: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes
            .push((pattern.into(), MockResponse::Body(body.into())));
        self
    }

    /// Fail URLs containing `pattern` with a transport error.
    pub fn with_failure(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes
            .push((pattern.into(), MockResponse::Failure(message.into())));
        self
    }

    /// All URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of requested URLs containing `pattern`.
    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|url| url.contains(pattern)).count()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());

        let route = self
            .routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()));

        match route {
            Some((_, MockResponse::Body(body))) => Ok(body.clone()),
            Some((_, MockResponse::Failure(message))) => Err(ClinError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(ClinError::Transport {
                url: url.to_string(),
                message: "no mock route registered".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
