use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use rqdash_app_core::domain::ModalOutcome;
use rqdash_cli::commands::{self, ActSelection};
use rqdash_cli::settings::{self, Overrides, SettingsManager, SettingsPatch};
use rqdash_cli::{CliAction, CliTarget};
use rqdash_core::{ActionKind, CommandRequest, TargetKind};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Monitor base URL
    #[arg(long, env = "RQDASH_URL", global = true)]
    url: Option<String>,
    /// Path prefix the monitor is mounted under
    #[arg(long, env = "RQDASH_PREFIX", global = true)]
    prefix: Option<String>,
    /// Broker instance index
    #[arg(short, long, env = "RQDASH_INSTANCE", global = true)]
    instance: Option<usize>,
    #[arg(long, env = "RQDASH_USERNAME", global = true)]
    username: Option<String>,
    #[arg(long, env = "RQDASH_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
    /// Directory holding settings.json
    #[arg(long, env = "RQDASH_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List queues with their job counts
    Queues,
    /// List workers
    Workers,
    /// List jobs in the given queues and statuses
    Jobs {
        #[arg(short, long = "queue")]
        queues: Vec<String>,
        #[arg(short, long = "status")]
        statuses: Vec<String>,
    },
    #[command(name = "worker-info")]
    WorkerInfo { worker_id: String },
    /// Redis memory in use
    Memory,
    /// Run a queue, job or worker command after confirmation
    Act {
        #[arg(value_enum)]
        target: CliTarget,
        #[arg(value_enum)]
        action: CliAction,
        /// Queue name or job id for single-target actions
        id: Option<String>,
        #[arg(long, help = "Queue the job came from (shown in the requeue prompt)")]
        origin_queue: Option<String>,
        #[arg(short, long = "queue", help = "Queues a bulk action applies to")]
        queues: Vec<String>,
        #[arg(short, long = "status", help = "Job statuses a bulk action applies to")]
        statuses: Vec<String>,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long, help = "Empty string clears it")]
        url_prefix: Option<String>,
        #[arg(long)]
        instance_index: Option<usize>,
        #[arg(long = "auth-user")]
        username: Option<String>,
        #[arg(long = "auth-password")]
        password: Option<String>,
        #[arg(long)]
        reload_on_error: Option<bool>,
        #[arg(long)]
        auto_dismiss_after_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let overrides = Overrides {
        base_url: cli.url,
        url_prefix: cli.prefix,
        instance_index: cli.instance,
        username: cli.username,
        password: cli.password,
    };
    let config_dir = cli.config_dir;
    let load = || -> anyhow::Result<_> {
        let saved = SettingsManager::new(config_dir.clone()).load()?;
        Ok(settings::resolve(saved, &overrides))
    };

    match cli.command {
        Commands::Queues => {
            commands::cmd_queues(&load()?).await?;
        }
        Commands::Workers => {
            commands::cmd_workers(&load()?).await?;
        }
        Commands::Jobs { queues, statuses } => {
            commands::cmd_jobs(&load()?, queues, statuses).await?;
        }
        Commands::WorkerInfo { worker_id } => {
            commands::cmd_worker_info(&load()?, &worker_id).await?;
        }
        Commands::Memory => {
            commands::cmd_memory(&load()?).await?;
        }
        Commands::Act {
            target,
            action,
            id,
            origin_queue,
            queues,
            statuses,
            yes,
        } => {
            let target = TargetKind::from(target);
            let action = ActionKind::from(action);
            let mut request = match id {
                Some(id) => CommandRequest::single(target, action, id),
                None => CommandRequest::bulk(target, action),
            };
            if let Some(queue) = origin_queue {
                request = request.with_origin_queue(queue);
            }

            let confirm = |prompt: &rqdash_core::Prompt| -> anyhow::Result<bool> {
                println!("{}", prompt.title);
                println!("{}", prompt.body);
                if yes {
                    return Ok(true);
                }
                Ok(Confirm::new()
                    .with_prompt("Proceed?")
                    .default(false)
                    .interact()?)
            };

            let report = commands::cmd_act(
                load()?,
                request,
                ActSelection { queues, statuses },
                confirm,
                false,
            )
            .await?;

            match report.outcome {
                None => println!("Cancelled."),
                Some(ModalOutcome::Success { message }) => {
                    println!("Success: {message}");
                    if target == TargetKind::Worker {
                        println!("Next: {}", report.toggle_label);
                    }
                }
                Some(ModalOutcome::Failure {
                    message,
                    status_label,
                    traceback,
                }) => {
                    if let Some(label) = status_label {
                        eprintln!("[{label}]");
                    }
                    if let Some(tb) = traceback {
                        eprintln!("{tb}");
                    }
                    bail!("{message}");
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => settings::handle_show(config_dir.clone())?,
            ConfigCommands::Set {
                base_url,
                url_prefix,
                instance_index,
                username,
                password,
                reload_on_error,
                auto_dismiss_after_ms,
            } => settings::handle_set(
                config_dir.clone(),
                SettingsPatch {
                    base_url,
                    url_prefix,
                    instance_index,
                    username,
                    password,
                    reload_on_error,
                    auto_dismiss_after_ms,
                },
            )?,
        },
    }

    Ok(())
}
