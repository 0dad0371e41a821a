//! Houselytics CLI Module
//!
//! Command-line interface for estimates, portfolio appraisal and model reports.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::ValuationConfig;
use crate::evaluation::evaluate;
use crate::insights::{check_hypotheses, top_correlations};
use crate::preprocessing::UserValues;
use crate::utils::{DataLoader, DataSaver};
use crate::valuation::{PropertyPreset, QualityTier, ValuationContext};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

/// Whole-dollar amount with thousands separators
pub fn format_money(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0 {
        format!("-${}", out)
    } else {
        format!("${}", out)
    }
}

/// Parse `Name=value` pairs for `--set`
fn parse_feature_value(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((name.trim().to_string(), value))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "houselytics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Property valuation from a pre-trained house price model")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Training table used to derive the feature schema
    #[arg(long, global = true)]
    pub training: Option<PathBuf>,

    /// Model artifact (JSON)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Raw table of inherited properties
    #[arg(long, global = true)]
    pub inherited: Option<PathBuf>,

    /// Target column name in the training table
    #[arg(long, global = true)]
    pub target: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the feature schema and training medians
    Schema,

    /// Estimate the value of one property
    Estimate {
        /// Feature value as NAME=VALUE (repeatable)
        #[arg(short = 's', long = "set", value_parser = parse_feature_value)]
        values: Vec<(String, f64)>,

        /// Construction quality (basic, standard, good, premium)
        #[arg(short, long)]
        quality: Option<QualityTier>,

        /// Keep only the fields of a form (quick, detailed)
        #[arg(long)]
        preset: Option<PropertyPreset>,
    },

    /// Value every property in the inherited table
    Portfolio {
        /// Write the annotated table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score the model on a held-out split of the training table
    Evaluate,

    /// Show the attributes most correlated with sale price
    Insights {
        /// Number of features to show
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Check the quality, living area and build year price hypotheses
    Hypotheses,
}

impl Cli {
    /// Resolve the configuration from `--config` and per-path overrides
    pub fn resolve_config(&self) -> anyhow::Result<ValuationConfig> {
        let mut config = match &self.config {
            Some(path) => ValuationConfig::from_file(path)?,
            None => ValuationConfig::default(),
        };
        if let Some(p) = &self.training {
            config = config.with_training_data(p);
        }
        if let Some(p) = &self.model {
            config = config.with_model_path(p);
        }
        if let Some(p) = &self.inherited {
            config = config.with_inherited_data(p);
        }
        if let Some(t) = &self.target {
            config = config.with_target(t);
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_context(config: &ValuationConfig) -> anyhow::Result<ValuationContext> {
    step_run("Loading schema and model");
    let start = Instant::now();
    let ctx = ValuationContext::load(config)?;
    step_done(&format!("{} features in {:?}", ctx.schema().len(), start.elapsed()));
    Ok(ctx)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_schema(config: &ValuationConfig) -> anyhow::Result<()> {
    section("Schema");

    let schema = crate::schema::SchemaReference::from_csv(&config.training_data, &config.target_column)?;

    println!("  {:<12} {}", muted("File"), config.training_data.display());
    println!("  {:<12} {}", muted("Target"), schema.target());
    println!("  {:<12} {}", muted("Features"), schema.len());
    println!();

    println!("  {:<24} {:>14}", muted("Feature"), muted("Median"));
    println!("  {}", dim(&"─".repeat(40)));
    for name in schema.feature_names() {
        let median = schema
            .median(name)
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "—".to_string());
        println!("  {:<24} {:>14}", name, median);
    }

    println!();
    Ok(())
}

pub fn cmd_estimate(
    config: &ValuationConfig,
    values: &[(String, f64)],
    quality: Option<QualityTier>,
    preset: Option<PropertyPreset>,
) -> anyhow::Result<()> {
    section("Estimate");
    let ctx = load_context(config)?;

    let mut user: UserValues = values.iter().map(|(k, v)| (k.clone(), *v)).collect();
    if let Some(tier) = quality {
        user.insert("OverallQual", tier.overall_qual());
    }
    let user = match preset {
        Some(form) => form.select(&user),
        None => user,
    };

    let estimate = ctx.estimate(&user)?;

    println!();
    println!(
        "  {:<24} {}",
        muted("Estimated Market Value"),
        format_money(estimate.value).white().bold()
    );
    if let Some(tier) = quality {
        println!("  {:<24} {}", muted("Quality"), tier.label());
    }
    println!(
        "  {:<24} {} of {}",
        muted("Inputs used"),
        estimate.inputs_used,
        user.len()
    );
    println!();
    println!(
        "  {}",
        dim("Machine learning estimate from historical sales; real market prices may differ.")
    );
    println!();
    Ok(())
}

pub fn cmd_portfolio(config: &ValuationConfig, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    section("Portfolio");
    let ctx = load_context(config)?;

    step_run("Loading inherited properties");
    let raw = DataLoader::new().load_csv(&config.inherited_data)?;
    step_done(&format!("{} rows × {} cols", raw.height(), raw.width()));

    let appraisal = ctx.appraise_portfolio(&raw)?;

    println!();
    for (i, price) in appraisal.predictions().iter().enumerate() {
        println!("  {:<16} {}", muted(&format!("House {}", i + 1)), format_money(*price));
    }
    println!("  {}", dim(&"─".repeat(32)));
    println!(
        "  {:<16} {}",
        muted("Total"),
        format_money(appraisal.total()).white().bold()
    );

    if let Some(path) = output {
        DataSaver::new().save_csv(&appraisal.annotated()?, path)?;
        println!();
        println!("  {} {}", ok("✓"), format!("Saved {}", path.display()));
    }

    println!();
    Ok(())
}

pub fn cmd_evaluate(config: &ValuationConfig) -> anyhow::Result<()> {
    section("Model Performance");
    let ctx = load_context(config)?;

    let training = DataLoader::new().load_csv(&config.training_data)?;
    let report = evaluate(ctx.model(), &training, ctx.schema(), config)?;

    println!();
    println!("  {:<16} {}", muted("Train R²"), format!("{:.3}", report.train_r2).white());
    println!("  {:<16} {}", muted("Test R²"), format!("{:.3}", report.test_r2).white().bold());
    println!("  {:<16} {}", muted("MAE"), format_money(report.test_mae).white());
    println!("  {:<16} {}", muted("RMSE"), format_money(report.test_rmse).white());
    println!("  {:<16} {} / {}", muted("Rows"), report.n_train, report.n_test);

    if let Some(importances) = ctx.feature_importances() {
        println!();
        println!("  {:<24} {:>10}", muted("Top drivers"), muted("Weight"));
        println!("  {}", dim(&"─".repeat(36)));
        for (name, weight) in importances.top_k(10) {
            println!("  {:<24} {:>10.4}", name, weight);
        }
    }

    println!();
    Ok(())
}

pub fn cmd_insights(config: &ValuationConfig, top: Option<usize>) -> anyhow::Result<()> {
    section("Data Insights");

    let df = DataLoader::new().load_csv(&config.training_data)?;
    let n = top.unwrap_or(config.top_correlations);
    let correlations = top_correlations(&df, &config.target_column, n)?;

    println!("  {:<24} {:>8} {:>10}", muted("Feature"), muted("r"), muted("Strength"));
    println!("  {}", dim(&"─".repeat(44)));
    for c in &correlations {
        println!("  {:<24} {:>8.3} {:>10}", c.feature, c.r, c.strength().to_string());
    }

    println!();
    Ok(())
}

pub fn cmd_hypotheses(config: &ValuationConfig) -> anyhow::Result<()> {
    section("Hypotheses");

    let df = DataLoader::new().load_csv(&config.training_data)?;
    let checks = check_hypotheses(&df, &config.target_column)?;

    for check in &checks {
        println!();
        println!("  {} {}", accent(check.hypothesis.feature), check.hypothesis.statement);
        match (check.r, check.strength()) {
            (Some(r), Some(strength)) => {
                let verdict = if check.is_supported() {
                    ok(&format!("supported ({})", strength))
                } else {
                    muted("weaker than expected")
                };
                println!("  {:<16} {:.3}", muted("Correlation"), r);
                println!("  {:<16} {}", muted("Conclusion"), verdict);
            }
            _ => println!("  {}", muted("Column missing or constant, not tested")),
        }
    }

    println!();
    Ok(())
}
