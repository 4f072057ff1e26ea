//! GatewayAPI backend: POST to the base URL with HTTP basic auth (the
//! API token as username, empty password). Only an exact 200 counts as
//! accepted; the response body is informational.

use std::time::Duration;

use serde::Serialize;
use smsout_core::{
    json_headers, ConfigStore, HttpReply, HttpRequest, IntegrationRecord, LogSink, Method,
    OutboundSms, Provider, SmsError,
};

const PROVIDER: &str = "GatewayAPI";
const BASE_URL: &str = "https://gatewayapi.com/rest/mtsms";
const TIMEOUT_SECS: u64 = 30;

/// GatewayAPI gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayApi;

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct GatewayApiProfile {
    pub base_url: String,
    pub token: String,
    pub sender: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    sender: &'a str,
    message: &'a str,
    recipients: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    msisdn: &'a str,
}

impl Provider for GatewayApi {
    type Profile = GatewayApiProfile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn resolve(
        &self,
        sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<GatewayApiProfile, SmsError> {
        let base_url = integration
            .text("gatewayApiBaseUrl")
            .or_else(|| config.text("gatewayApiBaseUrl"))
            .unwrap_or_else(|| BASE_URL.to_string());

        let token = integration
            .text("gatewayApiToken")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "token",
            })?;

        let sender = sms
            .from_number()
            .map(str::to_string)
            .or_else(|| integration.text("gatewayApiSender"))
            .unwrap_or_default();

        let timeout = config.seconds("gatewayApiTimeout").unwrap_or(TIMEOUT_SECS);

        Ok(GatewayApiProfile {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            sender,
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &GatewayApiProfile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let payload = SendPayload {
            sender: &profile.sender,
            message: &sms.body,
            recipients: vec![Recipient { msisdn: to_number }],
        };
        let body = serde_json::to_string(&payload).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        Ok(HttpRequest {
            method: Method::Post,
            url: profile.base_url.clone(),
            headers: json_headers(),
            basic_auth: Some((profile.token.clone(), String::new())),
            body: Some(body),
            timeout: profile.timeout,
            insecure_tls: true,
        })
    }

    fn interpret(&self, reply: &HttpReply, _log: &dyn LogSink) -> Result<(), SmsError> {
        if reply.status != 200 {
            return Err(SmsError::UnexpectedStatus {
                provider: PROVIDER,
                code: reply.status,
            });
        }

        // The body carries no success signal for this gateway.
        Ok(())
    }
}
