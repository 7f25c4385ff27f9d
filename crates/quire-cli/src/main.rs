//! quire: terminal front end for the download-job manager.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quire_core::domain::{BookId, TaskId};
use quire_core::{ManagerBuilder, PollingController, QuireConfig, TaskManager, Visibility};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::{StdoutRenderer, write_view};

/// Queue books for download and follow the remote worker.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Queue a book.
    Add {
        book_id: String,
        /// Display name.
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a task by id.
    Remove { task_id: TaskId },
    /// Remove every task.
    Clear,
    /// Queue a finished book again.
    Retry { book_id: String },
    /// Print the task list.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Poll the worker and print every update until Ctrl-C. Enter polls immediately.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is the render surface, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(QuireConfig::default_config_path);
    let config = QuireConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match cli.command {
        Command::Add { book_id, name } => {
            let manager = open(&config, false)?;
            let id = manager.add(BookId::new(book_id), name).await?;
            println!("{id}");
        }
        Command::Remove { task_id } => {
            let manager = open(&config, false)?;
            let removed = manager.remove(task_id).await?;
            println!("removed {} ({})", removed.id, removed.book_id);
        }
        Command::Clear => {
            let manager = open(&config, false)?;
            let n = manager.clear().await;
            println!("removed {n} tasks");
        }
        Command::Retry { book_id } => {
            let manager = open(&config, false)?;
            let id = manager.retry(&BookId::new(book_id)).await?;
            println!("{id}");
        }
        Command::List { json } => {
            let manager = open(&config, false)?;
            let view = manager.display_view().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                write_view(&mut std::io::stdout().lock(), &view)?;
            }
        }
        Command::Watch => {
            let manager = Arc::new(open(&config, true)?);
            watch_until_interrupted(manager, &config).await?;
        }
    }

    Ok(())
}

fn open(config: &QuireConfig, render: bool) -> anyhow::Result<TaskManager> {
    let mut builder = ManagerBuilder::from_config(config)?;
    if render {
        builder = builder.renderer(Arc::new(StdoutRenderer));
    }
    Ok(builder.build()?)
}

async fn watch_until_interrupted(manager: Arc<TaskManager>, config: &QuireConfig) -> anyhow::Result<()> {
    let (host, visibility) = watch::channel(Visibility::Foreground);
    let mut controller = PollingController::new(manager, config.poll_interval());
    controller.start(visibility);
    info!(url = %config.status_url, "watching");

    wait_for_interrupt(&host).await?;

    controller.stop_and_join().await;
    Ok(())
}

/// Each line on stdin counts as the terminal coming back to the foreground.
async fn wait_for_interrupt(host: &watch::Sender<Visibility>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            res = &mut ctrl_c => return Ok(res?),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    host.send_replace(Visibility::Foreground);
                }
                Ok(None) | Err(_) => stdin_open = false,
            },
        }
    }
}
