//! Houselytics - Main Entry Point
//!
//! Property valuation CLI backed by a pre-trained house price model.

use clap::Parser;
use houselytics::cli::{
    cmd_estimate, cmd_evaluate, cmd_hypotheses, cmd_insights, cmd_portfolio, cmd_schema, Cli,
    Commands,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "houselytics=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match &cli.command {
        Commands::Schema => cmd_schema(&config)?,
        Commands::Estimate { values, quality, preset } => {
            cmd_estimate(&config, values, *quality, *preset)?;
        }
        Commands::Portfolio { output } => cmd_portfolio(&config, output.as_deref())?,
        Commands::Evaluate => cmd_evaluate(&config)?,
        Commands::Insights { top } => cmd_insights(&config, *top)?,
        Commands::Hypotheses => cmd_hypotheses(&config)?,
    }

    Ok(())
}
