use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imagesync_config::SyncConfig;
use imagesync_core::LifecycleEvent;
use std::path::{Path, PathBuf};

/// Drive the image-sync custom resource outside of a stack operation
#[derive(Parser)]
#[command(name = "imagesync")]
#[command(version)]
#[command(about = "Drive the image-sync custom resource outside of a stack operation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level: trace, debug, info, warn, error (overrides IMAGESYNC_LOG_LEVEL)
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one lifecycle event against the configured build project and registry
    Invoke {
        /// Event payload as JSON ("-" reads stdin)
        #[arg(short, long, value_name = "FILE", conflicts_with = "request_type")]
        event: Option<PathBuf>,

        /// Build a minimal event with this RequestType instead of reading a file
        #[arg(short, long, value_name = "TYPE")]
        request_type: Option<String>,

        /// PhysicalResourceId for the minimal event
        #[arg(long, value_name = "ID", requires = "request_type")]
        physical_resource_id: Option<String>,
    },
    /// Print the resolved configuration as JSON
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SyncConfig::load().context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    imagesync_lambda::init::init_tracing(&config.log);

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Invoke {
            event,
            request_type,
            physical_resource_id,
        } => {
            let event = match (event, request_type) {
                (Some(path), _) => read_event(&path)?,
                (None, Some(request_type)) => {
                    let mut event = LifecycleEvent::new(request_type);
                    event.physical_resource_id = physical_resource_id;
                    event
                }
                (None, None) => anyhow::bail!("invoke needs either --event or --request-type"),
            };

            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to build tokio runtime")?
                .block_on(invoke(config, event))
        }
    }
}

async fn invoke(config: SyncConfig, event: LifecycleEvent) -> Result<()> {
    let sdk_config = imagesync_lambda::aws::load_sdk_config().await;
    let dispatcher = imagesync_lambda::build_dispatcher(config, &sdk_config);

    let result = dispatcher
        .on_event(&event)
        .await
        .context("Lifecycle event failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_event(path: &Path) -> Result<LifecycleEvent> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read event from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event JSON: {}", path.display()))
}
