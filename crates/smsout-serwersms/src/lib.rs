//! SerwerSMS backend: credentials travel in the JSON body, and the
//! gateway can report a failure through a top-level `error` object even
//! on an accepted HTTP status. Error codes are translated through a
//! catalog supplied by the embedding application.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use smsout_core::body::{as_code, parse_loose};
use smsout_core::{
    json_headers, ConfigStore, HttpReply, HttpRequest, IntegrationRecord, LogSink, Method,
    OutboundSms, Provider, SmsError,
};

const PROVIDER: &str = "SerwerSms";
const LABEL: &str = "Serwer SMS";
const BASE_URL: &str = "https://api2.serwersms.pl";
const TIMEOUT_SECS: u64 = 30;
const SYSTEM_TAG: &str = "client_rust";

/// SerwerSMS gateway with an optional error-code catalog.
#[derive(Debug, Clone, Default)]
pub struct SerwerSms {
    error_codes: HashMap<i64, String>,
}

impl SerwerSms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog resolving gateway error codes to human-readable text,
    /// preferred over the message the gateway sends along.
    pub fn with_error_codes(error_codes: HashMap<i64, String>) -> Self {
        Self { error_codes }
    }
}

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct SerwerSmsProfile {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub test: bool,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    system: &'a str,
    username: &'a str,
    password: &'a str,
    sender: &'a str,
    test: bool,
    text: &'a str,
    phone: &'a str,
}

impl Provider for SerwerSms {
    type Profile = SerwerSmsProfile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    fn resolve(
        &self,
        sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<SerwerSmsProfile, SmsError> {
        let base_url = integration
            .text("serwerSmsBaseUrl")
            .or_else(|| config.text("serwerSmsBaseUrl"))
            .unwrap_or_else(|| BASE_URL.to_string());

        let username = integration
            .text("serwerSmsUsername")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "username",
            })?;

        let password = integration
            .text("serwerSmsPassword")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "password",
            })?;

        let sender = sms
            .from_number()
            .map(str::to_string)
            .or_else(|| integration.text("serwerSmsSender"))
            .unwrap_or_default();

        let test = integration.flag("serwerSmsTest").unwrap_or(false);
        let timeout = config.seconds("serwerSmsTimeout").unwrap_or(TIMEOUT_SECS);

        Ok(SerwerSmsProfile {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            sender,
            test,
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &SerwerSmsProfile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let payload = SendPayload {
            system: SYSTEM_TAG,
            username: &profile.username,
            password: &profile.password,
            sender: &profile.sender,
            test: profile.test,
            text: &sms.body,
            phone: to_number,
        };
        let body = serde_json::to_string(&payload).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        Ok(HttpRequest {
            method: Method::Post,
            url: format!("{}/messages/send_sms", profile.base_url),
            headers: json_headers(),
            basic_auth: None,
            body: Some(body),
            timeout: profile.timeout,
            insecure_tls: true,
        })
    }

    fn interpret(&self, reply: &HttpReply, log: &dyn LogSink) -> Result<(), SmsError> {
        let body = parse_loose(&reply.body);

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(as_code).unwrap_or(0);
            let kind = error
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("");
            let message = self
                .error_codes
                .get(&code)
                .cloned()
                .or_else(|| {
                    error
                        .get("message")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                });

            if let Some(ref text) = message {
                log.error(&format!("{LABEL} ({kind}): [{code}] {text}"));
            }

            return Err(SmsError::ProviderError {
                provider: LABEL,
                code,
                message,
            });
        }

        if !reply.is_2xx() {
            return Err(SmsError::UnexpectedStatus {
                provider: LABEL,
                code: reply.status,
            });
        }

        Ok(())
    }
}
