use badger::utils::{logger, validation::Validate};
use badger::{BadgerConfig, YurplanClient};
use clap::Parser;

/// Prints the scan view of one ticket, to check names and types before a
/// print run.
#[derive(Parser)]
#[command(name = "ticket_show")]
#[command(about = "Show the detail view of a single Yurplan ticket")]
struct Args {
    /// Ticket id on the event platform
    #[arg(short, long)]
    ticket: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "badger.toml")]
    config: String,

    /// Event id, overrides yurplan.event_id
    #[arg(long)]
    event_id: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(&args).await {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(args: &Args) -> badger::Result<()> {
    let mut config = BadgerConfig::from_file(&args.config)?;
    if let Some(event_id) = &args.event_id {
        config.yurplan.event_id = event_id.clone();
    }
    config.validate()?;

    let mut client = YurplanClient::new(config.yurplan)?;
    client.authenticate().await?;

    let event_id = client.event_id().to_string();
    let ticket = client.ticket_detail(&event_id, &args.ticket).await?;
    println!("{}", serde_json::to_string_pretty(&ticket)?);
    Ok(())
}
