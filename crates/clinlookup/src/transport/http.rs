//! Blocking reqwest transport.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ClinError, Result};

use super::{Transport, redact_url};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error body kept in a transport error message.
const MAX_ERROR_BODY: usize = 200;

const USER_AGENT: &str = concat!("clinlookup/", env!("CARGO_PKG_VERSION"));

/// Transport backed by a blocking reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClinError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let transport_error = |message: String| ClinError::Transport {
            url: redact_url(url),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            let excerpt: String = error_text.chars().take(MAX_ERROR_BODY).collect();
            return Err(transport_error(format!("HTTP {}: {}", status, excerpt.trim())));
        }

        response
            .text()
            .map_err(|e| transport_error(format!("Failed to read response body: {}", e)))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::Arc;
    use std::thread;

    use crate::record::Failure;
    use crate::resolver::{Resolver, ResolverConfig};

    /// Serve one connection on a local port, answering with `handler`.
    fn serve_once<F>(handler: F) -> String
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_request(&mut stream);
                handler(stream);
            }
        });
        format!("http://{}/eutils/", addr)
    }

    fn read_request(stream: &mut TcpStream) {
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => seen.extend_from_slice(&buf[..n]),
            }
        }
    }

    fn respond(mut stream: TcpStream, status: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
    }

    #[test]
    fn test_success_returns_body() {
        let base = serve_once(|stream| respond(stream, "200 OK", r#"{"esearchresult":{}}"#));
        let transport = HttpTransport::new().unwrap();

        let body = transport.get(&format!("{}esearch.fcgi", base)).unwrap();
        assert_eq!(body, r#"{"esearchresult":{}}"#);
    }

    #[test]
    fn test_error_status_carries_status_and_excerpt() {
        let long_body = format!("API rate limit exceeded {}", "x".repeat(500));
        let base = serve_once(move |stream| respond(stream, "429 Too Many Requests", &long_body));
        let transport = HttpTransport::new().unwrap();

        let err = transport
            .get(&format!("{}esearch.fcgi?api_key=secret", base))
            .unwrap_err();

        match err {
            ClinError::Transport { url, message } => {
                assert!(url.contains("api_key=***"));
                assert!(!url.contains("secret"));
                assert!(message.contains("429"));
                assert!(message.contains("API rate limit exceeded"));
                assert!(message.len() < 300);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_becomes_search_error() {
        let base = serve_once(|stream| {
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        });
        let config = ResolverConfig {
            base_url: base,
            ..Default::default()
        };
        let transport = HttpTransport::with_timeout(Duration::from_millis(200)).unwrap();
        let resolver = Resolver::with_transport(config, Arc::new(transport));

        let failure = resolver.resolve("CHD8", "p.Arg1580Trp").unwrap_err();
        assert!(matches!(failure, Failure::SearchError { .. }));
    }
}
