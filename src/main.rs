use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kol_roi::campaign::input::{CampaignInput, CampaignOverrides, RawCampaign, RawInfluencer};
use kol_roi::campaign::roster::Roster;
use kol_roi::campaign::validate::validate_input;
use kol_roi::config::Config;
use kol_roi::output::charts::{build_charts, render_charts_text};
use kol_roi::output::csv::{results_to_csv, write_results_csv};
use kol_roi::output::render_json;
use kol_roi::output::table::{render_methodology, render_report};
use kol_roi::roi::calculator::compute_report;
use kol_roi::roi::RoiReport;
use kol_roi::server::run_server;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "kol-roi",
    about = "ROI calculator for influencer marketing campaigns"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Campaign file (TOML, or JSON with a .json extension).
    #[arg(short, long)]
    input: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(flatten)]
    campaign: CampaignArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct CampaignArgs {
    #[arg(long)]
    budget: Option<f64>,
    #[arg(long = "avg-order-value")]
    avg_order_value: Option<f64>,
    /// Industry conversion rate in percent.
    #[arg(long = "conversion-rate")]
    conversion_rate_pct: Option<f64>,
    /// "direct" or "with_engagement".
    #[arg(long)]
    method: Option<String>,
    #[arg(long = "no-adjustment")]
    no_adjustment: bool,
    #[arg(long = "cost-factor")]
    cost_factor: Option<f64>,
    /// Attribution factor in percent.
    #[arg(long = "attribution")]
    attribution_pct: Option<f64>,
}

impl From<CampaignArgs> for CampaignOverrides {
    fn from(value: CampaignArgs) -> Self {
        Self {
            budget: value.budget,
            avg_order_value: value.avg_order_value,
            conversion_rate_pct: value.conversion_rate_pct,
            method: value.method,
            disable_adjustment: value.no_adjustment,
            cost_factor: value.cost_factor,
            attribution_pct: value.attribution_pct,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute per-influencer and total ROI.
    Compute,
    /// Chart data: ROI by influencer, cost vs. revenue, reach share.
    Charts,
    /// Write the results spreadsheet (CSV).
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        stdout: bool,
    },
    /// Describe the calculation methods.
    Methodology,
    /// Print a campaign file with the default roster.
    Sample {
        /// Template rows appended after the default roster.
        #[arg(long, default_value_t = 0)]
        extra: usize,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let overrides: CampaignOverrides = cli.campaign.clone().into();
    config.apply_overrides(&overrides);
    debug!("loaded config from {}", config_path.display());

    match &cli.command {
        Commands::Config { init, show } => {
            return handle_config_command(*init, *show, &config, &config_path);
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, addr).await;
        }
        Commands::Methodology => {
            println!("{}", render_methodology());
            return Ok(());
        }
        Commands::Sample { extra } => {
            return print_sample(&config.campaign, *extra, cli.output);
        }
        _ => {}
    }

    let (campaign, influencers) = load_campaign(cli.input.as_deref(), &config, &overrides)?;
    let report = build_report(&campaign, &influencers)?;

    match &cli.command {
        Commands::Compute => print_report(&report, cli.output)?,
        Commands::Charts => {
            let charts = build_charts(&report.results);
            match cli.output {
                OutputFormat::Table => println!("{}", render_charts_text(&charts)),
                OutputFormat::Json => println!("{}", render_json(&charts)?),
                OutputFormat::Csv => {
                    warn!("CSV output for charts not implemented, using JSON");
                    println!("{}", render_json(&charts)?);
                }
            }
        }
        Commands::Export { out, stdout } => {
            if *stdout {
                print!("{}", results_to_csv(&report.results)?);
            } else {
                let path = out.clone().unwrap_or_else(|| config.resolved_csv_path());
                write_results_csv(&path, &report.results)?;
                info!("wrote {} rows to {}", report.results.len(), path.display());
                println!("Exported results to {}", path.display());
            }
        }
        Commands::Config { .. }
        | Commands::Serve { .. }
        | Commands::Methodology
        | Commands::Sample { .. } => unreachable!("handled before computation"),
    }

    Ok(())
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

/// Campaign section precedence: input file, then config; CLI flags win over
/// both.
fn load_campaign(
    input: Option<&Path>,
    config: &Config,
    overrides: &CampaignOverrides,
) -> Result<(RawCampaign, Vec<RawInfluencer>)> {
    let document = match input {
        Some(path) => {
            info!("loading campaign from {}", path.display());
            CampaignInput::load(path)?
        }
        None => {
            debug!("no campaign file given, using default roster");
            CampaignInput::default()
        }
    };
    let from_file = document.campaign.is_some();
    let (mut campaign, influencers) = document.resolve(&config.campaign);
    if from_file {
        campaign.apply_overrides(overrides);
    }
    Ok((campaign, influencers))
}

fn build_report(campaign: &RawCampaign, influencers: &[RawInfluencer]) -> Result<RoiReport> {
    let (params, records) =
        validate_input(campaign, influencers).context("invalid campaign input")?;
    let report = compute_report(&params, &records);
    info!(
        "computed {} influencers, total ROI {:.2}%",
        report.results.len(),
        report.totals.total_roi_percent
    );
    Ok(report)
}

fn print_report(report: &RoiReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_report(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", results_to_csv(&report.results)?),
    }
    Ok(())
}

fn print_sample(campaign: &RawCampaign, extra: usize, format: OutputFormat) -> Result<()> {
    let mut roster = Roster::default();
    for _ in 0..extra {
        roster.add();
    }
    let sample = CampaignInput {
        campaign: Some(campaign.clone()),
        influencers: roster.into_rows(),
    };
    match format {
        OutputFormat::Json => println!("{}", render_json(&sample)?),
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}", toml::to_string_pretty(&sample)?)
        }
    }
    Ok(())
}
