// ABOUTME: Example application demonstrating templated batch sending
// ABOUTME: Reads credentials from CLICKATELL_* environment variables and sends one template to many recipients

use argh::FromArgs;
use clickatell::client::{BatchSender, ClientBuilder, TemplateFields};
use clickatell::{ItemOutcome, Reply};
use std::error::Error;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Send one templated message to several recipients using a batch
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the template, with #field1#, #field2#, ... placeholders
    #[argh(option, short = 'm')]
    template: String,

    /// a recipient telephone number (repeatable)
    #[argh(option, short = 't')]
    to: Vec<String>,

    /// a value for the next template field (repeatable)
    #[argh(option)]
    field: Vec<String>,

    /// send with quicksend (no field substitution) and keep the batch open
    #[argh(switch)]
    quick: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut client = ClientBuilder::from_env()?.build()?;

    if !cli_args.quick {
        let fields = TemplateFields::positional(cli_args.field);
        if client.send_bulk(cli_args.to.as_slice(), &cli_args.template, &fields).await? {
            info!("Bulk send to {} recipients complete", cli_args.to.len());
        } else {
            warn!("Bulk send finished but some recipients were rejected");
        }
        return Ok(());
    }

    let batch_id = client.start_batch(&cli_args.template).await?;
    info!("Opened batch {batch_id}");

    match client.quick_send(&batch_id, cli_args.to.as_slice()).await? {
        Reply::Single(id) => println!("{id}"),
        Reply::Multiple(items) => {
            for item in items {
                match item.outcome {
                    ItemOutcome::Accepted { id } => println!("{} -> {id}", item.to),
                    ItemOutcome::Rejected { code, message } => {
                        println!("{} rejected: {code} {message}", item.to)
                    }
                }
            }
        }
    }

    println!("Batch {batch_id} left open for further quicksends");
    Ok(())
}
