use badger::badge::template::BadgeTemplate;
use badger::utils::{logger, validation::Validate};
use badger::{
    BadgeEngine, BadgePipeline, BadgeRules, BadgerConfig, BadgerError, CliConfig, LocalStorage,
    YurplanClient,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting badger");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Badge run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &CliConfig) -> Result<(), BadgerError> {
    tracing::info!("📁 Loading configuration from: {}", cli.config);
    let mut config = BadgerConfig::from_file(&cli.config)?;
    cli.apply_to(&mut config)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let template_path = config.template_path()?;
    let template = BadgeTemplate::from_file(&template_path)?;

    let rules = BadgeRules {
        type_ids: config.ticket_types.clone(),
        exceptions: config.exceptions()?,
        corrections: config.corrections(),
    };
    tracing::debug!(
        "{} exceptions, {} corrections",
        rules.exceptions.len(),
        rules.corrections.len()
    );

    let output_path = config.badge.output_path.clone();
    let client = YurplanClient::new(config.yurplan)?;
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = BadgePipeline::new(client, storage, template, rules, output_path);
    let mut engine = BadgeEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No badges will be written");
        let records = engine.preview().await?;
        for record in &records {
            println!(
                "{:<9} {:<24} {} {}",
                record.badge_type, record.token, record.firstname, record.lastname
            );
        }
        println!("{} badges", records.len());
        return Ok(());
    }

    let output_path = engine.run().await?;
    tracing::info!("✅ Badge run completed successfully!");
    println!("✅ Badges written to: {}", output_path);
    Ok(())
}
