//! Verimor backend: credentials in the JSON body, one-element `messages`
//! array per recipient, fixed `datacoding`. The endpoint is not
//! configurable.

use std::time::Duration;

use serde::Serialize;
use smsout_core::body::{error_message, parse_loose};
use smsout_core::{
    ConfigStore, Headers, HttpReply, HttpRequest, IntegrationRecord, LogSink, Method, OutboundSms,
    Provider, SmsError,
};

const PROVIDER: &str = "Verimor";
const BASE_URL: &str = "http://sms.verimor.com.tr/v2";
const TIMEOUT_SECS: u64 = 24;

const DATACODING: &str = "1";

/// Verimor gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verimor;

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct VerimorProfile {
    pub username: String,
    pub password: String,
    pub sender: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    username: &'a str,
    password: &'a str,
    source_addr: Option<&'a str>,
    datacoding: &'a str,
    messages: Vec<MessagePart<'a>>,
}

#[derive(Debug, Serialize)]
struct MessagePart<'a> {
    msg: &'a str,
    dest: &'a str,
}

impl Provider for Verimor {
    type Profile = VerimorProfile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn resolve(
        &self,
        _sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<VerimorProfile, SmsError> {
        let username = integration
            .text("verimorUsername")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "username",
            })?;

        let password = integration
            .text("verimorPassword")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "password",
            })?;

        let timeout = config
            .seconds("verimorSmsSendTimeout")
            .unwrap_or(TIMEOUT_SECS);

        Ok(VerimorProfile {
            username,
            password,
            sender: integration.text("verimorSender"),
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &VerimorProfile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let payload = SendPayload {
            username: &profile.username,
            password: &profile.password,
            source_addr: profile.sender.as_deref(),
            datacoding: DATACODING,
            messages: vec![MessagePart {
                msg: &sms.body,
                dest: to_number,
            }],
        };
        let body = serde_json::to_string(&payload).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        let headers: Headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "*/*".to_string()),
        ];

        Ok(HttpRequest {
            method: Method::Post,
            url: format!("{BASE_URL}/send.json"),
            headers,
            basic_auth: None,
            body: Some(body),
            timeout: profile.timeout,
            insecure_tls: false,
        })
    }

    fn interpret(&self, reply: &HttpReply, log: &dyn LogSink) -> Result<(), SmsError> {
        if reply.status == 0 || reply.is_2xx() {
            return Ok(());
        }

        let message = error_message(&parse_loose(&reply.body));

        if let Some(ref text) = message {
            log.error(&format!("{PROVIDER} SMS sending error. Message: {text}"));
        }

        Err(SmsError::ProviderError {
            provider: PROVIDER,
            code: i64::from(reply.status),
            message,
        })
    }
}
