//! Generic dispatcher: one per-recipient flow parameterized over a
//! provider capability set, instead of one near-identical loop per
//! gateway.

use std::sync::Arc;

use crate::log::LogSink;
use crate::number::{format_number, DialFormat};
use crate::record::{IntegrationRecord, IntegrationStore};
use crate::settings::ConfigStore;
use crate::transport::{HttpReply, HttpRequest, HttpTransport, TransportError};
use crate::{OutboundSms, SmsError};

/// One SMS gateway: how to resolve its settings, shape its requests, and
/// read its answers.
pub trait Provider: Send + Sync {
    /// Resolved per-send configuration bundle. Built fresh for every
    /// recipient, never cached.
    type Profile: Send + Sync;

    /// Integration record key, e.g. `"GatewayAPI"`.
    fn name(&self) -> &'static str;

    /// Human-facing label used in log lines and error messages.
    fn label(&self) -> &'static str {
        self.name()
    }

    /// Dial-string policy for recipient numbers.
    fn dial_format(&self) -> DialFormat {
        DialFormat::E164
    }

    /// Merge integration-record fields, global config, and hardcoded
    /// defaults into a profile. First non-empty value wins.
    fn resolve(
        &self,
        sms: &OutboundSms,
        integration: &IntegrationRecord,
        config: &dyn ConfigStore,
    ) -> Result<Self::Profile, SmsError>;

    /// Build the wire request for one recipient. `to_number` has already
    /// been formatted per [`Provider::dial_format`].
    fn build_request(
        &self,
        sms: &OutboundSms,
        profile: &Self::Profile,
        to_number: &str,
    ) -> Result<HttpRequest, SmsError>;

    /// Map status code and body to an outcome. Diagnostics go to the log
    /// sink; they never change the outcome.
    fn interpret(&self, reply: &HttpReply, log: &dyn LogSink) -> Result<(), SmsError>;
}

/// Fans one message out to its recipients, one blocking gateway call per
/// recipient, aborting on the first failure.
pub struct SmsDispatcher<P, T> {
    provider: P,
    transport: T,
    integrations: Arc<dyn IntegrationStore>,
    config: Arc<dyn ConfigStore>,
    log: Arc<dyn LogSink>,
}

impl<P: Provider, T: HttpTransport> SmsDispatcher<P, T> {
    pub fn new(
        provider: P,
        transport: T,
        integrations: Arc<dyn IntegrationStore>,
        config: Arc<dyn ConfigStore>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            provider,
            transport,
            integrations,
            config,
            log,
        }
    }

    /// Send to every recipient in list order. The first recipient that
    /// fails aborts the whole call; success means every recipient was
    /// accepted by the gateway.
    pub async fn send(&self, sms: &OutboundSms) -> Result<(), SmsError> {
        if sms.to_numbers.is_empty() {
            return Err(SmsError::MissingRecipient);
        }

        for to_number in &sms.to_numbers {
            self.send_to_number(sms, to_number).await?;
        }

        Ok(())
    }

    async fn send_to_number(&self, sms: &OutboundSms, to_number: &str) -> Result<(), SmsError> {
        let integration = self
            .integrations
            .fetch(self.provider.name())
            .filter(|record| record.enabled)
            .ok_or(SmsError::IntegrationDisabled(self.provider.name()))?;

        let profile = self.provider.resolve(sms, &integration, &*self.config)?;

        if to_number.is_empty() {
            return Err(SmsError::MissingRecipient);
        }

        let dial = format_number(to_number, self.provider.dial_format());

        if !dial.chars().any(|c| c.is_ascii_digit()) {
            return Err(SmsError::MissingRecipient);
        }

        let request = self.provider.build_request(sms, &profile, &dial)?;

        match self.transport.execute(request).await {
            Ok(reply) => self.provider.interpret(&reply, &*self.log),
            Err(TransportError::TimedOut) => Err(SmsError::Timeout(self.provider.label())),
            // Other transport failures carry no HTTP status; the
            // interpreter sees status 0 and applies its own status
            // semantics.
            Err(TransportError::Failed(_)) => self.provider.interpret(&HttpReply::none(), &*self.log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use crate::record::MemoryIntegrations;
    use crate::settings::MemoryConfig;
    use crate::transport::{json_headers, Method, MockTransport};
    use std::time::Duration;

    /// Minimal gateway used to exercise the dispatcher flow.
    struct TestGateway;

    struct TestProfile {
        token: String,
    }

    impl Provider for TestGateway {
        type Profile = TestProfile;

        fn name(&self) -> &'static str {
            "TestGateway"
        }

        fn resolve(
            &self,
            _sms: &OutboundSms,
            integration: &IntegrationRecord,
            _config: &dyn ConfigStore,
        ) -> Result<TestProfile, SmsError> {
            let token = integration
                .text("token")
                .ok_or(SmsError::MissingCredential {
                    provider: "TestGateway",
                    field: "token",
                })?;
            Ok(TestProfile { token })
        }

        fn build_request(
            &self,
            sms: &OutboundSms,
            profile: &TestProfile,
            to_number: &str,
        ) -> Result<HttpRequest, SmsError> {
            Ok(HttpRequest {
                method: Method::Post,
                url: format!("https://gateway.test/{to_number}"),
                headers: json_headers(),
                basic_auth: Some((profile.token.clone(), String::new())),
                body: Some(sms.body.clone()),
                timeout: Duration::from_secs(10),
                insecure_tls: false,
            })
        }

        fn interpret(&self, reply: &HttpReply, _log: &dyn LogSink) -> Result<(), SmsError> {
            if reply.status != 200 {
                return Err(SmsError::UnexpectedStatus {
                    provider: "TestGateway",
                    code: reply.status,
                });
            }
            Ok(())
        }
    }

    fn dispatcher(
        integrations: MemoryIntegrations,
        transport: MockTransport,
    ) -> SmsDispatcher<TestGateway, MockTransport> {
        SmsDispatcher::new(
            TestGateway,
            transport,
            Arc::new(integrations),
            Arc::new(MemoryConfig::new()),
            Arc::new(MemoryLog::new()),
        )
    }

    fn enabled_record() -> IntegrationRecord {
        IntegrationRecord::new(true).with_field("token", "secret")
    }

    #[tokio::test]
    async fn empty_recipient_list_fails_without_network() {
        let transport = MockTransport::new();
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec![]);
        assert!(matches!(d.send(&sms).await, Err(SmsError::MissingRecipient)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_record_is_disabled() {
        let transport = MockTransport::new();
        let d = dispatcher(MemoryIntegrations::new(), transport.clone());

        let sms = OutboundSms::new("hi", vec!["+15550001111".into()]);
        assert!(matches!(
            d.send(&sms).await,
            Err(SmsError::IntegrationDisabled("TestGateway"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn disabled_record_is_disabled() {
        let transport = MockTransport::new();
        let d = dispatcher(
            MemoryIntegrations::new()
                .with("TestGateway", IntegrationRecord::new(false).with_field("token", "secret")),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+15550001111".into()]);
        assert!(matches!(
            d.send(&sms).await,
            Err(SmsError::IntegrationDisabled("TestGateway"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let transport = MockTransport::new();
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", IntegrationRecord::new(true)),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+15550001111".into()]);
        assert!(matches!(
            d.send(&sms).await,
            Err(SmsError::MissingCredential { field: "token", .. })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn digitless_recipient_is_rejected() {
        let transport = MockTransport::new();
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        for recipient in ["", "no digits here"] {
            let sms = OutboundSms::new("hi", vec![recipient.into()]);
            assert!(matches!(d.send(&sms).await, Err(SmsError::MissingRecipient)));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn timeout_maps_to_timeout_error() {
        let transport = MockTransport::new().timeout();
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+15550001111".into()]);
        assert!(matches!(d.send(&sms).await, Err(SmsError::Timeout("TestGateway"))));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_recipients() {
        let transport = MockTransport::new().reply(500, "");
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+15550001111".into(), "+15550002222".into()]);
        assert!(matches!(
            d.send(&sms).await,
            Err(SmsError::UnexpectedStatus { code: 500, .. })
        ));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn all_recipients_in_order_on_success() {
        let transport = MockTransport::new().reply(200, "").reply(200, "");
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+1 555 000 1111".into(), "+1 555 000 2222".into()]);
        d.send(&sms).await.unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://gateway.test/+15550001111".to_string(),
                "https://gateway.test/+15550002222".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_status_zero() {
        let transport = MockTransport::new().failure("connection refused");
        let d = dispatcher(
            MemoryIntegrations::new().with("TestGateway", enabled_record()),
            transport.clone(),
        );

        let sms = OutboundSms::new("hi", vec!["+15550001111".into()]);
        assert!(matches!(
            d.send(&sms).await,
            Err(SmsError::UnexpectedStatus { code: 0, .. })
        ));
    }
}
