// ABOUTME: Long-running Clickatell client example demonstrating session keep-alive
// ABOUTME: Shows how to keep a gateway session alive and recover when it is lost

//! # Long-Running Clickatell Client with Keep-Alive
//!
//! The gateway expires sessions after 15 minutes of inactivity. This example
//! keeps one session alive with periodic pings and optionally sends a message
//! at a fixed interval.
//!
//! ## Usage
//!
//! ```bash
//! # Keep-alive only, credentials from CLICKATELL_* variables
//! cargo run --example long_running_client
//!
//! # With periodic SMS sending
//! cargo run --example long_running_client -- --to 27999000001 --sms-interval 120
//!
//! # Custom keep-alive settings
//! cargo run --example long_running_client -- \
//!   --keep-alive-interval 300 --max-failures 5 --run-duration 3600
//! ```

use argh::FromArgs;
use clickatell::client::{ClientBuilder, GatewaySession, KeepAliveConfig, MessageSender};
use std::error::Error;
use std::time::Duration;
use tokio::time::{interval, sleep};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Long-running Clickatell client with keep-alive functionality
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// keep-alive interval in seconds (default: 600)
    #[argh(option)]
    keep_alive_interval: Option<u64>,

    /// maximum consecutive ping failures before renewing the session (default: 3)
    #[argh(option)]
    max_failures: Option<u32>,

    /// how long to run the client in seconds (default: 1800)
    #[argh(option)]
    run_duration: Option<u64>,

    /// interval between SMS sends in seconds (default: 300)
    #[argh(option)]
    sms_interval: Option<u64>,

    /// the recipient telephone number (optional - no SMS sent if not provided)
    #[argh(option, short = 't')]
    to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let run_duration = Duration::from_secs(cli_args.run_duration.unwrap_or(1800));
    let sms_interval = Duration::from_secs(cli_args.sms_interval.unwrap_or(300));

    let mut keep_alive = KeepAliveConfig::new(Duration::from_secs(
        cli_args.keep_alive_interval.unwrap_or(600),
    ));
    if let Some(max_failures) = cli_args.max_failures {
        keep_alive = keep_alive.with_max_failures(max_failures);
    }

    let mut client = ClientBuilder::from_env()?.keep_alive(keep_alive).build()?;

    info!("Starting long-running Clickatell client");
    info!("Will run for {} seconds", run_duration.as_secs());

    client.authenticate(false).await.map_err(|e| {
        error!("Authentication failed: {e}");
        Box::<dyn Error>::from(e.to_string())
    })?;

    let mut sms_timer = cli_args.to.as_ref().map(|_| interval(sms_interval));
    let mut keep_alive_timer = interval(Duration::from_secs(30));

    let start_time = std::time::Instant::now();
    let mut message_count = 0;

    loop {
        tokio::select! {
            _ = sleep(run_duration.saturating_sub(start_time.elapsed())) => {
                info!("Run duration elapsed, shutting down");
                break;
            }

            _ = keep_alive_timer.tick() => {
                match client.maintain_keep_alive().await {
                    Ok(true) => debug!("Keep-alive ping sent"),
                    Ok(false) => debug!("Keep-alive ping not needed"),
                    Err(e) => warn!("Keep-alive ping failed: {}", e),
                }

                if client.is_keep_alive_failed() {
                    warn!("Session lost after repeated ping failures, re-authenticating");
                    if let Err(e) = client.authenticate(true).await {
                        error!("Re-authentication failed: {e}");
                        break;
                    }
                }
            }

            _ = async {
                match sms_timer.as_mut() {
                    Some(timer) => { timer.tick().await; }
                    None => std::future::pending::<()>().await,
                }
            } => {
                if let Some(to) = &cli_args.to {
                    message_count += 1;
                    let text = format!("Test message #{message_count} from long-running client");

                    match client.send(to, &text).await {
                        Ok(message_id) => info!("Message {} sent, ID: {}", message_count, message_id),
                        Err(e) => error!("Failed to send message {}: {}", message_count, e),
                    }
                }
            }
        }
    }

    let final_status = client.keep_alive_status();
    info!("Final keep-alive statistics:");
    info!("  Total pings sent: {}", final_status.total_pings);
    info!("  Total pings answered: {}", final_status.total_pongs);
    info!("  Final consecutive failures: {}", final_status.consecutive_failures);
    info!("  Total SMS messages sent: {}", message_count);

    Ok(())
}
