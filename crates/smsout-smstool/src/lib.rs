//! Smstool backend: client id/secret travel both as custom headers and
//! inside the JSON body. Optional settings are sent as JSON null when
//! absent, matching the gateway's API.

use std::time::Duration;

use serde::Serialize;
use smsout_core::body::{error_message, parse_loose};
use smsout_core::{
    json_headers, ConfigStore, HttpReply, HttpRequest, IntegrationRecord, LogSink, Method,
    OutboundSms, Provider, SmsError,
};

const PROVIDER: &str = "Smstool";
const BASE_URL: &str = "https://api.smsgatewayapi.com/v1";
const TIMEOUT_SECS: u64 = 10;

/// Smstool gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smstool;

/// Resolved per-send settings.
#[derive(Debug, Clone)]
pub struct SmstoolProfile {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub sender: Option<String>,
    pub reference: Option<String>,
    pub test: Option<bool>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    sender: Option<&'a str>,
    reference: Option<&'a str>,
    test: Option<bool>,
    message: &'a str,
    to: &'a str,
}

impl Provider for Smstool {
    type Profile = SmstoolProfile;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn resolve(
        &self,
        _sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<SmstoolProfile, SmsError> {
        let client_id = integration
            .text("smstoolClientId")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "client id",
            })?;

        let client_secret = integration
            .text("smstoolClientSecret")
            .ok_or(SmsError::MissingCredential {
                provider: PROVIDER,
                field: "client secret",
            })?;

        let base_url = integration
            .text("smstoolBaseUrl")
            .or_else(|| config.text("smstoolBaseUrl"))
            .unwrap_or_else(|| BASE_URL.to_string());

        let timeout = config
            .seconds("smstoolSmsSendTimeout")
            .unwrap_or(TIMEOUT_SECS);

        Ok(SmstoolProfile {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
            sender: integration.text("smstoolSender"),
            reference: integration.text("smstoolReference"),
            test: integration.flag("smstoolTest"),
            timeout: Duration::from_secs(timeout),
        })
    }

    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &SmstoolProfile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError> {
        let payload = SendPayload {
            client_id: &profile.client_id,
            client_secret: &profile.client_secret,
            sender: profile.sender.as_deref(),
            reference: profile.reference.as_deref(),
            test: profile.test,
            message: &sms.body,
            to: to_number,
        };
        let body = serde_json::to_string(&payload).map_err(|e| SmsError::Unexpected(e.to_string()))?;

        let mut headers = json_headers();
        headers.insert(0, ("X-Client-Id".to_string(), profile.client_id.clone()));
        headers.insert(
            1,
            ("X-Client-Secret".to_string(), profile.client_secret.clone()),
        );

        Ok(HttpRequest {
            method: Method::Post,
            url: format!("{}/message/send", profile.base_url),
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

#[cfg(test)]
mod tests {
    use super::*;
    use smsout_core::{MemoryConfig, MemoryLog};

    fn record() -> IntegrationRecord {
        IntegrationRecord::new(true)
            .with_field("smstoolClientId", "cid")
            .with_field("smstoolClientSecret", "sec")
    }

    fn sms() -> OutboundSms {
        OutboundSms::new("hoi", vec!["+31612345678".into()])
    }

    #[test]
    fn payload_and_headers() {
        let record = record()
            .with_field("smstoolSender", "Acme")
            .with_field("smstoolTest", true);
        let profile = Smstool.resolve(&sms(), &record, &MemoryConfig::new()).unwrap();
        let request = Smstool.build_request(&sms(), &profile, "+31612345678").unwrap();

        assert_eq!(request.url, "https://api.smsgatewayapi.com/v1/message/send");
        assert_eq!(request.headers[0], ("X-Client-Id".to_string(), "cid".to_string()));
        assert_eq!(request.headers[1], ("X-Client-Secret".to_string(), "sec".to_string()));

        let body = request.body.unwrap();
        assert!(body.contains(r#""client_id":"cid""#));
        assert!(body.contains(r#""sender":"Acme""#));
        assert!(body.contains(r#""test":true"#));
        // Unset reference goes over the wire as null.
        assert!(body.contains(r#""reference":null"#));
        assert!(body.contains(r#""to":"+31612345678""#));
    }

    #[test]
    fn missing_client_secret() {
        let record = IntegrationRecord::new(true).with_field("smstoolClientId", "cid");
        let err = Smstool.resolve(&sms(), &record, &MemoryConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            SmsError::MissingCredential { field: "client secret", .. }
        ));
    }

    #[test]
    fn non_2xx_extracts_message() {
        let log = MemoryLog::new();
        let reply = HttpReply {
            status: 422,
            body: r#"{"message":"Invalid recipient"}"#.into(),
        };

        let err = Smstool.interpret(&reply, &log).unwrap_err();
        match err {
            SmsError::ProviderError { code, message, .. } => {
                assert_eq!(code, 422);
                assert_eq!(message.as_deref(), Some("Invalid recipient"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            log.errors(),
            vec!["Smstool SMS sending error. Message: Invalid recipient"]
        );
    }

    #[test]
    fn unparseable_error_body_degrades_to_no_message() {
        let log = MemoryLog::new();
        let reply = HttpReply { status: 500, body: "oops".into() };

        let err = Smstool.interpret(&reply, &log).unwrap_err();
        assert!(matches!(
            err,
            SmsError::ProviderError { code: 500, message: None, .. }
        ));
        assert!(log.errors().is_empty());
    }

    #[test]
    fn accepted_statuses() {
        let log = MemoryLog::new();
        for status in [200, 201, 204] {
            let reply = HttpReply { status, body: String::new() };
            assert!(Smstool.interpret(&reply, &log).is_ok());
        }
    }
}
