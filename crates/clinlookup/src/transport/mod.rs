//! HTTP transport seam for the E-utilities endpoints.
//!
//! The resolver only ever issues plain GET requests and reads the body as
//! text, so the seam is a single method. [`HttpTransport`] talks to the
//! network; [`MockTransport`] serves canned bodies for tests.

mod http;
mod mock;

pub use http::{DEFAULT_TIMEOUT, HttpTransport};
pub use mock::MockTransport;

use crate::error::Result;

/// Trait for HTTP transports.
///
/// Implementations must be thread-safe (Send + Sync) so one transport can
/// be shared by a resolver and the batch driver that owns it.
pub trait Transport: Send + Sync {
    /// Issue a GET request and return the response body.
    ///
    /// Network failures, non-success statuses and unreadable bodies are all
    /// reported as [`crate::ClinError::Transport`].
    fn get(&self, url: &str) -> Result<String>;

    /// Get the name of this transport (for logging/debugging).
    fn name(&self) -> &str;
}

/// Mask the value of an `api_key` query parameter so URLs can be logged.
pub fn redact_url(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}
