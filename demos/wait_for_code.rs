//! Rent a number through a running gateway and wait for the code.
//!
//! The wait can be cancelled with Ctrl+C; on timeout the rental is cancelled.
//!
//! # Running
//!
//! ```bash
//! cargo run --bin sms-gateway &
//! SMS_GATEWAY_URL=http://localhost:8080 SMS_SERVICE=tg cargo run --example wait_for_code
//! ```
//!
//! Optional: `SMS_PROVIDER` (`sms-activate` or `5sim`), `SMS_COUNTRY`.

use sms_gateway::{
    CancellationToken, GatewayClient, GatewayClientError, RentRequest, WaitConfig,
};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = env::var("SMS_GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let service = env::var("SMS_SERVICE").unwrap_or_else(|_| "tg".into());

    let client = GatewayClient::new(&base_url)?;

    let info = client.info().await?;
    println!(
        "{} {} (configured: {:?})",
        info.name, info.version, info.configured_providers
    );

    for balance in client.balances().await? {
        println!("  {} balance: {}", balance.provider, balance.balance);
    }

    let mut request = RentRequest::new(service);
    if let Ok(provider) = env::var("SMS_PROVIDER") {
        request = request.with_provider(provider);
    }
    if let Ok(country) = env::var("SMS_COUNTRY") {
        request = request.with_country(country);
    }

    println!("\nRequesting phone number...");
    let rental = client.rent(&request).await?;
    println!("Got phone number: {}", rental.number);
    println!("Rental ID: {} ({})", rental.id, rental.provider);

    let cancel_token = CancellationToken::new();
    let token_clone = cancel_token.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Cancelling wait...");
            token_clone.cancel();
        }
    });

    let config = WaitConfig::default()
        .with_timeout(Duration::from_secs(180))
        .with_poll_interval(Duration::from_secs(5));

    println!("\nWaiting for SMS code (Ctrl+C to stop)...");
    match client.wait_for_code(&rental, &config, cancel_token).await {
        Ok(received) => {
            println!("Received SMS code: {}", received.code);
            if let Some(text) = received.full_text {
                println!("Message: {}", text);
            }
        }
        Err(GatewayClientError::Cancelled {
            elapsed,
            poll_count,
            ..
        }) => {
            println!(
                "Wait cancelled after {:.1}s ({} polls); rental left open",
                elapsed.as_secs_f64(),
                poll_count
            );
        }
        Err(GatewayClientError::Timeout {
            elapsed,
            poll_count,
            ..
        }) => {
            println!(
                "Timed out after {:.1}s ({} polls); rental cancelled",
                elapsed.as_secs_f64(),
                poll_count
            );
        }
        Err(e) => {
            println!("Error: {}", e);
        }
    }

    ctrl_c.abort();
    Ok(())
}
