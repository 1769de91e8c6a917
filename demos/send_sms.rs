// ABOUTME: Example application demonstrating SMS sending through the Clickatell HTTP API
// ABOUTME: Shows ClientBuilder usage, sending a message and querying its delivery status

use argh::FromArgs;
use clickatell::client::{ClientBuilder, Credentials, MessageSender};
use std::error::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Example application to show the simplest case of sending an SMS message
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the API id of the HTTP API instance
    #[argh(option)]
    api_id: String,

    /// the account username
    #[argh(option, short = 'u')]
    username: String,

    /// the account password
    #[argh(option)]
    password: String,

    /// the gateway host (default: api.clickatell.com)
    #[argh(option)]
    host: Option<String>,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the sender id the message will be from (optional)
    #[argh(option, short = 'f')]
    from: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut builder = ClientBuilder::new(Credentials::new(
        cli_args.api_id,
        cli_args.username,
        cli_args.password,
    ));
    if let Some(host) = cli_args.host {
        builder = builder.host(host);
    }
    if let Some(from) = cli_args.from {
        builder = builder.from(from);
    }

    let mut client = builder.build()?;

    match client.send(&cli_args.to, &cli_args.message).await {
        Ok(message_id) => {
            println!("Message sent successfully! Message ID: {message_id}");

            let report = client.query(&message_id).await?;
            match report.status {
                Some(status) => println!("Status {}: {status:?}", report.raw_status),
                None => println!("Status {}", report.raw_status),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to send message: {e}");
            Err(Box::<dyn Error>::from(e.to_string()))
        }
    }
}
