//! # SMS Out
//!
//! Multi-provider outbound SMS dispatch for Rust.
//!
//! ## Features
//!
//! - **Multi-provider support**: GatewayAPI, SerwerSMS, sms77, Smstool,
//!   Verimor, playSMS
//! - **One dispatch flow**: a generic dispatcher drives every gateway
//!   through a small provider capability trait
//! - **Layered configuration**: integration record, then global config,
//!   then hardcoded defaults; first non-empty value wins
//! - **Typed errors**: one terminal error taxonomy across all gateways
//! - **Pluggable transport**: reqwest in production, a scripted mock in
//!   tests
//! - **Observability**: diagnostics flow through an injected log sink
//!   backed by `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smsout::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let integrations = MemoryIntegrations::new().with(
//!         "GatewayAPI",
//!         IntegrationRecord::new(true).with_field("gatewayApiToken", "secret"),
//!     );
//!
//!     let dispatcher = SmsDispatcher::new(
//!         GatewayApi,
//!         ReqwestTransport,
//!         Arc::new(integrations),
//!         Arc::new(MemoryConfig::new()),
//!         Arc::new(TracingLog),
//!     );
//!
//!     let sms = OutboundSms::new("Hello!", vec!["+4512345678".into()]);
//!     dispatcher.send(&sms).await?;
//!     Ok(())
//! }
//! ```

pub use smsout_core::*;

pub use smsout_gatewayapi::{GatewayApi, GatewayApiProfile};
pub use smsout_playsms::{PlaySms, PlaySmsProfile};
pub use smsout_serwersms::{SerwerSms, SerwerSmsProfile};
pub use smsout_sms77::{Sms77, Sms77Profile};
pub use smsout_smstool::{Smstool, SmstoolProfile};
pub use smsout_verimor::{Verimor, VerimorProfile};

/// Common imports for smsout usage
pub mod prelude {
    pub use smsout_core::{
        ConfigStore, DialFormat, IntegrationRecord, IntegrationStore, LogSink, MemoryConfig,
        MemoryIntegrations, OutboundSms, Provider, ReqwestTransport, SmsDispatcher, SmsError,
        TracingLog,
    };

    pub use smsout_gatewayapi::GatewayApi;
    pub use smsout_playsms::PlaySms;
    pub use smsout_serwersms::SerwerSms;
    pub use smsout_sms77::Sms77;
    pub use smsout_smstool::Smstool;
    pub use smsout_verimor::Verimor;
}
