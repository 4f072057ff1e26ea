//! Send an SMS through the GatewayAPI backend.
use std::env;
use std::sync::Arc;

use smsout::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let token = arg_or_env("--token", "GATEWAYAPI_TOKEN");
    let to = arg_or_env("--to", "SMS_TO");
    let text = arg_or_env("--text", "SMS_TEXT");

    let integrations = MemoryIntegrations::new().with(
        "GatewayAPI",
        IntegrationRecord::new(true).with_field("gatewayApiToken", token),
    );

    // Global settings, e.g. SMSOUT_GATEWAYAPITIMEOUT=5.
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("SMSOUT"))
        .build()?;

    let dispatcher = SmsDispatcher::new(
        GatewayApi,
        ReqwestTransport,
        Arc::new(integrations),
        Arc::new(settings),
        Arc::new(TracingLog),
    );

    let sms = OutboundSms::new(text, vec![to.clone()]);
    dispatcher.send(&sms).await?;
    println!("Sent to {to} via GatewayAPI");
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if idx + 1 < args.len() {
            return args[idx + 1].clone();
        }
    }
    env::var(env_key)
        .unwrap_or_else(|_| panic!("missing {} (arg {} or env {})", flag, flag, env_key))
}
