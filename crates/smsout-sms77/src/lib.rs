//! sms77 backend: API key in a custom header, and a `success` field in
//! the response body where only the value 100 means accepted. Known
//! non-success codes map to fixed diagnostic texts; the raised error
//! always carries the raw HTTP code.

use std::time::Duration;

use serde::Serialize;
use smsout_core::body::{as_code, parse_loose};
use smsout_core::{
    json_headers, ConfigStore, HttpReply, HttpRequest, IntegrationRecord, LogSink, Method,
    OutboundSms, Provider, SmsError,
};

const PROVIDER: &str = "Sms77";
const LABEL: &str = "sms77";
const BASE_URL: &str = "https://gateway.sms77.io/api";
const TIMEOUT_SECS: u64 = 10;

/// Gateway-level success code.
const SUCCESS: i64 = 100;

/// sms77 gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sms77;

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct Sms77Profile {
    pub base_url: String,
    pub api_key: String,
    pub from: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: Option<&'a str>,
    text: &'a str,
    to: &'a str,
}

impl Provider for Sms77 {
    type Profile = Sms77Profile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    fn resolve(
        &self,
        _sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<Sms77Profile, SmsError> {
        // This gateway's base URL is overridable on the record only.
        let base_url = integration
            .text("apiBaseUrl")
            .unwrap_or_else(|| BASE_URL.to_string());

        let api_key = integration
            .text("sms77ApiKey")
            .ok_or(SmsError::MissingCredential {
                provider: LABEL,
                field: "API key",
            })?;

        let from = integration.text("sms77From");
        let timeout = config.seconds("sms77SmsSendTimeout").unwrap_or(TIMEOUT_SECS);

        Ok(Sms77Profile {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            from,
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &Sms77Profile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let payload = SendPayload {
            from: profile.from.as_deref(),
            text: &sms.body,
            to: to_number,
        };
        let body = serde_json::to_string(&payload).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        let mut headers = json_headers();
        headers.insert(0, ("X-Api-Key".to_string(), profile.api_key.clone()));

        Ok(HttpRequest {
            method: Method::Post,
            url: format!("{}/sms", profile.base_url),
            headers,
            basic_auth: None,
            body: Some(body),
            timeout: profile.timeout,
            insecure_tls: false,
        })
    }

    fn interpret(&self, reply: &HttpReply, log: &dyn LogSink) -> Result<(), SmsError> {
        // A zero status means no HTTP exchange happened; there is no body
        // to inspect.
        if reply.status == 0 {
            return Ok(());
        }

        let body = parse_loose(&reply.body);
        let success = body.get("success").and_then(as_code);

        if success == Some(SUCCESS) {
            return Ok(());
        }

        let message = success.and_then(describe).map(str::to_string);

        if let Some(ref text) = message {
            log.error(&format!("{LABEL} SMS sending error. Message: {text}"));
        }

        Err(SmsError::ProviderError {
            provider: LABEL,
            code: i64::from(reply.status),
            message,
        })
    }
}

/// Diagnostic texts for the gateway's known non-success codes.
fn describe(code: i64) -> Option<&'static str> {
    match code {
        201 => Some(
            "The sender is invalid. A maximum of 11 alphanumeric or 16 numeric characters are allowed.",
        ),
        202 => Some("The recipient number is invalid."),
        301 => Some("The variable to is not set."),
        305 => Some("The variable text is not set."),
        401 => Some("The variable text is too long."),
        402 => Some(
            "The Reload Lock prevents sending this SMS as it has already been sent within the last 180 seconds.",
        ),
        403 => Some("The maximum limit for this number per day has been reached."),
        500 => Some("The account has too little credit available."),
        600 => Some("The carrier delivery failed."),
        700 => Some("An unknown error occurred."),
        900 => Some("The authentication failed. Please check your API key."),
        902 => Some("The API key has no access rights to this endpoint."),
        903 => Some("The server IP is wrong."),
        _ => None,
    }
}
