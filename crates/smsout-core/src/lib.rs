//! # SMS Out Core
//!
//! Core traits and types for the smsout multi-provider SMS dispatch layer.
//!
//! This crate provides the building blocks the provider crates plug into:
//! - [`Provider`] trait describing one gateway (profile resolution,
//!   request building, response interpretation)
//! - [`SmsDispatcher`] fanning a message out to its recipients
//! - [`HttpTransport`] abstraction with a reqwest implementation
//! - Collaborator traits for integration records, global config, and logging
//!
//! ## Example
//!
//! ```rust,ignore
//! use smsout_core::{OutboundSms, SmsDispatcher};
//!
//! // Any gateway implements Provider; the dispatcher drives it.
//! let dispatcher = SmsDispatcher::new(provider, transport, integrations, config, log);
//! dispatcher.send(&OutboundSms::new("Hello!", vec!["+15550001111".into()])).await?;
//! ```

use serde::{Deserialize, Serialize};

pub mod body;
pub mod dispatch;
pub mod log;
pub mod number;
pub mod record;
pub mod settings;
pub mod transport;

pub use dispatch::{Provider, SmsDispatcher};
pub use log::{LogSink, MemoryLog, TracingLog};
pub use number::{format_number, DialFormat};
pub use record::{IntegrationRecord, IntegrationStore, MemoryIntegrations};
pub use settings::{ConfigStore, MemoryConfig};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::{
    json_headers, Headers, HttpReply, HttpRequest, HttpTransport, Method, MockTransport,
    TransportError,
};

/// Errors that can occur during SMS dispatch
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// No recipient phone number on the message
    #[error("no recipient phone number")]
    MissingRecipient,
    /// Integration record is missing or disabled
    #[error("{0} integration is not enabled")]
    IntegrationDisabled(&'static str),
    /// A required credential resolved to empty
    #[error("{provider}: no {field}")]
    MissingCredential {
        provider: &'static str,
        field: &'static str,
    },
    /// The gateway did not answer within the configured timeout
    #[error("{0}: SMS sending timeout")]
    Timeout(&'static str),
    /// The gateway answered with a status the provider does not accept
    #[error("{provider}: unexpected HTTP code {code}")]
    UnexpectedStatus { provider: &'static str, code: u16 },
    /// The gateway reported a send failure
    #[error("{provider}: SMS sending error, code {code}")]
    ProviderError {
        provider: &'static str,
        code: i64,
        message: Option<String>,
    },
    /// Unexpected internal error
    #[error("unexpected: {0}")]
    Unexpected(String),
}

/// One outgoing message: body text, optional sender id, and an ordered
/// list of destination numbers. Immutable once handed to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundSms {
    pub body: String,
    pub from_number: Option<String>,
    pub to_numbers: Vec<String>,
}

impl OutboundSms {
    pub fn new(body: impl Into<String>, to_numbers: Vec<String>) -> Self {
        Self {
            body: body.into(),
            from_number: None,
            to_numbers,
        }
    }

    pub fn with_from_number(mut self, from_number: impl Into<String>) -> Self {
        self.from_number = Some(from_number.into());
        self
    }

    /// Sender id if present and non-empty.
    pub fn from_number(&self) -> Option<&str> {
        self.from_number.as_deref().filter(|s| !s.is_empty())
    }
}
