use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use weatherboard_core::{
    Config, InputError, RenderOutcome, WeatherProvider, WeatherTable, fetch_all,
    input::clean_city_names, provider_from_config, render_dashboard,
};

use crate::prompt::{self, InquirePrompter, LinePrompter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherboard",
    version,
    about = "Current weather dashboard for a list of cities",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch weather for the given cities and draw the dashboard (default).
    Run(RunArgs),

    /// Store an OpenWeatherMap API key in the config file.
    Configure,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// City to include; repeat for several. Prompts interactively when absent.
    #[arg(long = "city", value_name = "NAME")]
    pub cities: Vec<String>,

    /// Where to write the dashboard image. The directory must exist.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// OpenWeatherMap API key, overriding the config file.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Save the image without opening it.
    #[arg(long)]
    pub no_show: bool,
}

impl RunArgs {
    /// Layer command-line flags over the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(output) = &self.output {
            config.output_path = Some(output.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }
        if self.no_show {
            config.show = Some(false);
        }
    }

    /// Cities from `--city` flags, or from prompts when none were given.
    fn cities(&self) -> Result<Vec<String>> {
        if !self.cities.is_empty() {
            let cities = clean_city_names(&self.cities);
            if cities.is_empty() {
                return Err(InputError::NoCities.into());
            }
            return Ok(cities);
        }

        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            prompt::collect_cities(&mut InquirePrompter)
        } else {
            prompt::collect_cities(&mut LinePrompter::new(stdin.lock()))
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Run(args)) => run_dashboard(args).await,
            Some(Command::Configure) => configure(),
            None => run_dashboard(self.run).await,
        }
    }
}

async fn run_dashboard(args: RunArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    let cities = args.cities()?;

    println!("Program started...");
    let provider = provider_from_config(&config)?;
    run_pipeline(&config, &cities, provider.as_ref()).await;
    println!("Program ended.");
    Ok(())
}

/// How a pipeline run ended. None of these fail the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardStatus {
    /// No city produced a record; the renderer was not called.
    NoData,
    Rendered(PathBuf),
    /// Rendering failed and was reported.
    RenderFailed,
}

/// Fetch every city, print the table and draw the dashboard.
pub async fn run_pipeline(
    config: &Config,
    cities: &[String],
    provider: &dyn WeatherProvider,
) -> DashboardStatus {
    let report = fetch_all(provider, cities).await;
    let table = WeatherTable::from_records(report.records);

    println!("Here is the data we got:");
    println!("{table}");

    if table.is_empty() {
        println!("No data to show");
        return DashboardStatus::NoData;
    }

    draw(&table, &config.output_path(), config.show())
}

/// Render and optionally open the dashboard. Failures are reported, never propagated.
fn draw(table: &WeatherTable, output: &Path, show: bool) -> DashboardStatus {
    match render_dashboard(table, output) {
        Ok(RenderOutcome::Rendered(summary)) => {
            info!(path = %summary.path.display(), panels = summary.panels, "dashboard rendered");
            if show {
                open_image(&summary.path);
            }
            DashboardStatus::Rendered(summary.path)
        }
        Ok(RenderOutcome::Skipped) => DashboardStatus::NoData,
        Err(e) => {
            error!(error = %format!("{e:#}"), "rendering failed");
            println!("Failed to render dashboard: {e:#}");
            DashboardStatus::RenderFailed
        }
    }
}

fn open_image(path: &Path) {
    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if let Err(e) = webbrowser::open(&target.to_string_lossy()) {
        warn!(path = %target.display(), error = %e, "could not open dashboard image");
        println!("Dashboard written to {}", target.display());
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.api_key = Some(key.trim().to_string());
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}
