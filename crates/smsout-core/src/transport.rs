//! HTTP transport abstraction. Providers describe the request they need;
//! the transport owns connect/read timeouts, headers, basic auth, and
//! TLS-verification behavior, and hands back status plus raw body.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

/// Lightweight header representation to avoid tying the core to any HTTP
/// framework.
pub type Headers = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One fully described outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    /// Username/password pair for HTTP basic auth.
    pub basic_auth: Option<(String, String)>,
    pub body: Option<String>,
    /// Used for both the connect and the read timeout.
    pub timeout: Duration,
    /// Disables TLS certificate verification. A compatibility behavior
    /// required by two gateways, not a recommendation.
    pub insecure_tls: bool,
}

/// Status code plus raw body. A status of 0 means the request produced
/// no HTTP exchange at all (transport failure other than a timeout).
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// Reply standing in for a failed exchange.
    pub fn none() -> Self {
        Self {
            status: 0,
            body: String::new(),
        }
    }

    pub fn is_2xx(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connect or read timeout.
    #[error("operation timed out")]
    TimedOut,
    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Failed(String),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpReply, TransportError>;
}

/// The `Content-Type`/`Accept` pair shared by the JSON gateways.
pub fn json_headers() -> Headers {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

/// reqwest-backed transport. A client is built per request because
/// timeouts and TLS behavior are resolved per dispatch.
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

#[cfg(feature = "reqwest")]
#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpReply, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(request.timeout)
            .timeout(request.timeout)
            .danger_accept_invalid_certs(request.insecure_tls)
            .build()
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) if e.is_timeout() => return Err(TransportError::TimedOut),
            // An unreadable body degrades to an empty one; the status
            // check still runs.
            Err(_) => String::new(),
        };

        Ok(HttpReply { status, body })
    }
}

#[cfg(feature = "reqwest")]
fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::Failed(error.to_string())
    }
}

/// Scripted transport for tests: hands out the queued outcomes in order,
/// records every request, and counts calls.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Result<HttpReply, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with the given status and body.
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpReply {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queue a connect/read timeout.
    pub fn timeout(self) -> Self {
        self.push(Err(TransportError::TimedOut));
        self
    }

    /// Queue a non-timeout transport failure.
    pub fn failure(self, message: &str) -> Self {
        self.push(Err(TransportError::Failed(message.to_string())));
        self
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    fn push(&self, outcome: Result<HttpReply, TransportError>) {
        lock(&self.replies).push_back(outcome);
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpReply, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            Ok(HttpReply {
                status: 200,
                body: String::new(),
            })
        })
    }
}

fn lock<T>(value: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
