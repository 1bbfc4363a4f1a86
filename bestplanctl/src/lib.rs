use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bestplan_core::{
    load_bestplan_config, BestPlanConfig, Catalog, CatalogSource, JsonCatalogSource,
    PlanSelector, SelectionReport,
};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_PATH: &str = "configs/bestplan.toml";

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] bestplan_core::ConfigError),
    #[error("catalog error: {0}")]
    Plan(#[from] bestplan_core::PlanError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the cheapest plan combination for a feature set", long_about = None)]
pub struct Cli {
    /// Path to bestplan.toml (defaults to configs/bestplan.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Catalog file overriding catalog.path
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Upper bound on enumerated combinations, overriding selection.max_combinations
    #[arg(long)]
    pub max_combinations: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the cheapest combination covering the given features
    Select(SelectArgs),
    /// List every plan in the catalog
    Plans,
    /// List known features and the plans providing them
    Features,
    /// Print a shell completion script
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Requested features, space or comma separated
    #[arg(value_name = "FEATURE", value_delimiter = ',')]
    pub features: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return write_completions(args.shell, &mut io::stdout().lock());
    }

    let context = build_context(&cli, |config| init_tracing(&config.logging.level))?;
    debug!(
        target: "bestplanctl",
        catalog = %context.catalog_path.display(),
        plans = context.catalog.len(),
        "context ready"
    );

    let mut out = io::stdout().lock();
    match &cli.command {
        Commands::Select(args) => {
            let report = context.select(&args.features)?;
            render(&report, cli.format, &mut out)?;
        }
        Commands::Plans => render(&context.plan_list(), cli.format, &mut out)?,
        Commands::Features => render(&context.feature_list(), cli.format, &mut out)?,
        Commands::Completions(_) => {}
    }

    Ok(())
}

/// Loads the config, hands it to `install_logging`, then loads the catalog,
/// so catalog events reach whatever subscriber the config selected.
fn build_context<F>(cli: &Cli, install_logging: F) -> Result<AppContext>
where
    F: FnOnce(&BestPlanConfig),
{
    let config = load_config(cli)?;
    install_logging(&config);
    AppContext::with_config(cli, config)
}

fn load_config(cli: &Cli) -> Result<BestPlanConfig> {
    let mut config = match &cli.config {
        Some(path) => load_bestplan_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_bestplan_config(DEFAULT_CONFIG_PATH)?
        }
        None => BestPlanConfig::default(),
    };
    if let Some(limit) = cli.max_combinations {
        config.selection.max_combinations = Some(limit);
    }
    Ok(config)
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, out);
    Ok(())
}

fn render<T, W>(value: &T, format: OutputFormat, out: &mut W) -> Result<()>
where
    T: Serialize + DisplayFallback,
    W: Write,
{
    match format {
        OutputFormat::Text => writeln!(out, "{}", value.display())?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

trait DisplayFallback {
    fn display(&self) -> String;
}

#[derive(Debug)]
struct AppContext {
    config: BestPlanConfig,
    catalog_path: PathBuf,
    catalog: Catalog,
}

impl AppContext {
    #[cfg(test)]
    fn new(cli: &Cli) -> Result<Self> {
        Self::with_config(cli, load_config(cli)?)
    }

    fn with_config(cli: &Cli, config: BestPlanConfig) -> Result<Self> {
        let catalog_path = cli
            .catalog
            .clone()
            .unwrap_or_else(|| config.catalog_path());
        let catalog = JsonCatalogSource::new(&catalog_path).load()?;

        Ok(Self {
            config,
            catalog_path,
            catalog,
        })
    }

    fn select(&self, features: &[String]) -> Result<SelectionReport> {
        let selector = PlanSelector::new(&self.catalog)
            .with_max_combinations(self.config.selection.max_combinations);
        let best = selector.select(features)?;
        Ok(SelectionReport::new(features, best.as_ref()))
    }

    fn plan_list(&self) -> PlanList {
        PlanList {
            rows: self
                .catalog
                .plans()
                .iter()
                .map(|plan| PlanRow {
                    name: plan.name.clone(),
                    cost: plan.cost,
                    features: plan.features.clone(),
                })
                .collect(),
        }
    }

    fn feature_list(&self) -> FeatureList {
        let selector = PlanSelector::new(&self.catalog);
        let index = selector.index();
        FeatureList {
            rows: self
                .catalog
                .features()
                .into_iter()
                .map(|feature| FeatureRow {
                    feature: feature.to_string(),
                    plans: index
                        .plans_for(feature)
                        .iter()
                        .map(|plan| plan.name.clone())
                        .collect(),
                })
                .collect(),
        }
    }
}

impl DisplayFallback for SelectionReport {
    fn display(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct PlanList {
    pub rows: Vec<PlanRow>,
}

#[derive(Debug, Serialize)]
pub struct PlanRow {
    pub name: String,
    pub cost: f64,
    pub features: Vec<String>,
}

impl DisplayFallback for PlanList {
    fn display(&self) -> String {
        if self.rows.is_empty() {
            return "Catalog is empty".to_string();
        }
        self.rows
            .iter()
            .map(|row| {
                format!(
                    "{name:<8} ${cost:>8.2}  {features}",
                    name = row.name,
                    cost = row.cost,
                    features = row.features.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureList {
    pub rows: Vec<FeatureRow>,
}

#[derive(Debug, Serialize)]
pub struct FeatureRow {
    pub feature: String,
    pub plans: Vec<String>,
}

impl DisplayFallback for FeatureList {
    fn display(&self) -> String {
        if self.rows.is_empty() {
            return "No features declared".to_string();
        }
        self.rows
            .iter()
            .map(|row| format!("{}: {}", row.feature, row.plans.join(" ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
