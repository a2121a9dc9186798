use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealtask_core::{
    load_config, validate_config, Config, LotusDealSender, SanitizedConfig, SubmitOutcome,
    SwanHttpConnector, TaskCreator,
};

/// Config file used when neither `--config` nor `DEALTASK_CONFIG` is set
const DEFAULT_CONFIG_PATH: &str = "dealtask.toml";

#[derive(Parser)]
#[command(name = "dealtask")]
#[command(about = "Create storage deal tasks from CAR file manifests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a task from the upload manifest and submit it
    Task(TaskArgs),
}

#[derive(Args, Debug, Default)]
struct TaskArgs {
    /// Configuration file (overrides DEALTASK_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding car.json
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving the task manifests
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Task name
    #[arg(long)]
    name: Option<String>,

    /// Storage provider id for private tasks
    #[arg(long)]
    miner: Option<String>,

    /// Curated dataset name
    #[arg(long)]
    dataset: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Only write the manifests, do not contact Swan
    #[arg(long)]
    offline: bool,
}

impl TaskArgs {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var("DEALTASK_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Flags win over the file and environment.
    fn apply(&self, config: &mut Config) {
        let task = &mut config.task;
        if let Some(dir) = &self.input_dir {
            task.input_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            task.output_dir = dir.clone();
        }
        if let Some(name) = &self.name {
            task.task_name = Some(name.clone());
        }
        if let Some(miner) = &self.miner {
            task.miner_fid = Some(miner.clone());
        }
        if let Some(dataset) = &self.dataset {
            task.dataset = Some(dataset.clone());
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if self.offline {
            task.offline_mode = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Task(args) => run_task(args).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_task(args: TaskArgs) -> Result<()> {
    let config_path = args.config_path();
    info!("Loading configuration from {:?}", config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    args.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    debug!(
        config = %serde_json::to_string(&sanitized).unwrap_or_default(),
        "Configuration loaded"
    );

    let deal_sender =
        LotusDealSender::new(&config.deal.lotus).context("Failed to create Lotus client")?;
    let creator = TaskCreator::new(deal_sender, SwanHttpConnector);

    let outcome = creator
        .create_task(&config.task, &config.deal)
        .await
        .context("Task creation failed")?;

    match &outcome.submission {
        SubmitOutcome::Offline { csv_path } => {
            info!(csv = %csv_path.display(), "Task saved for manual submission")
        }
        SubmitOutcome::Submitted { message, .. } => info!(%message, "Task submitted to Swan"),
    }

    println!("{}", outcome.json_file_name);
    println!("{}", outcome.task.uuid);

    Ok(())
}
