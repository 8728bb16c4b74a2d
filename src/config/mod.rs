pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::BadgerConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "badger")]
#[command(about = "Print conference badges from Yurplan tickets")]
pub struct CliConfig {
    #[arg(short, long, default_value = "badger.toml", help = "Path to the TOML configuration")]
    pub config: String,

    #[arg(long, help = "SVG badge template, overrides badge.template")]
    pub template: Option<String>,

    #[arg(long, help = "Output directory, overrides badge.output_path")]
    pub output_path: Option<String>,

    #[arg(long, help = "Event id, overrides yurplan.event_id")]
    pub event_id: Option<String>,

    #[arg(long, help = "TOML file with [exceptions] and [corrections] tables")]
    pub overrides: Option<String>,

    #[arg(long, help = "List the badges without rendering them")]
    pub dry_run: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut BadgerConfig) -> crate::Result<()> {
        if let Some(template) = &self.template {
            tracing::info!("🔧 Template overridden to: {}", template);
            config.badge.template = template.clone();
        }
        if let Some(output_path) = &self.output_path {
            tracing::info!("🔧 Output path overridden to: {}", output_path);
            config.badge.output_path = output_path.clone();
        }
        if let Some(event_id) = &self.event_id {
            tracing::info!("🔧 Event overridden to: {}", event_id);
            config.yurplan.event_id = event_id.clone();
        }
        if let Some(overrides) = &self.overrides {
            config.merge_overrides_file(overrides)?;
        }
        Ok(())
    }
}
