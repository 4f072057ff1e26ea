//! playSMS backend: a legacy GET webservice. Credentials and message all
//! travel as query parameters; there is no request body and no JSON mode
//! on this API. Recipient numbers are sent as bare digits, optionally
//! behind a configured dialing prefix.

use std::time::Duration;

use serde::Serialize;
use smsout_core::body::{error_message, parse_loose};
use smsout_core::{
    format_number, ConfigStore, DialFormat, HttpReply, HttpRequest, IntegrationRecord, LogSink,
    Method, OutboundSms, Provider, SmsError,
};

const PROVIDER: &str = "playSMS";
const TIMEOUT_SECS: u64 = 10;

/// playSMS gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaySms;

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct PlaySmsProfile {
    pub base_url: String,
    pub username: String,
    pub token: String,
    /// Sender number, already reduced to bare digits.
    pub from: String,
    pub number_prefix: Option<String>,
    pub timeout: Duration,
}

/// Query-string layout of the `ws` webservice application.
#[derive(Debug, Serialize)]
struct SendQuery<'a> {
    app: &'a str,
    u: &'a str,
    h: &'a str,
    op: &'a str,
    to: &'a str,
    from: &'a str,
    msg: &'a str,
}

impl Provider for PlaySms {
    type Profile = PlaySmsProfile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn dial_format(&self) -> DialFormat {
        DialFormat::BareDigits
    }

    fn resolve(
        &self,
        sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<PlaySmsProfile, SmsError> {
        // Self-hosted gateway: there is no default endpoint to fall
        // back to.
        let base_url = integration
            .text("playSmsBaseUrl")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "base URL",
            })?;

        let username = integration
            .text("playSmsUsername")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "username",
            })?;

        let token = integration
            .text("playSmsWebservicesToken")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "webservices token",
            })?;

        let from = sms.from_number().ok_or(SmsError::MissingCredential {
            provider: PROVIDER,
            field: "sender phone number",
        })?;

        let timeout = config.seconds("playSmsSendTimeout").unwrap_or(TIMEOUT_SECS);

        Ok(PlaySmsProfile {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            token,
            from: format_number(from, DialFormat::BareDigits),
            number_prefix: integration.text("playSmsNumberPrefix"),
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &PlaySmsProfile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let to = match &profile.number_prefix {
            Some(prefix) => format!("{prefix}{to_number}"),
            None => to_number.to_string(),
        };

        let query = SendQuery {
            app: "ws",
            u: &profile.username,
            h: &profile.token,
            op: "pv",
            to: &to,
            from: &profile.from,
            msg: &sms.body,
        };
        let query =
            serde_urlencoded::to_string(&query).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        Ok(HttpRequest {
            method: Method::Get,
            url: format!("{}/index.php?{query}", profile.base_url),
            headers: Vec::new(),
            basic_auth: None,
            body: None,
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
