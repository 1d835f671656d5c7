use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codemap_model::JobStatus;
use codemap_service::Codemap;
use codemap_store::MemoryStore;
use codemap_walk::{build_tree, locate_root, score_dir};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "codemap")]
#[command(about = "Map an archived codebase into an analyzed tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a ZIP archive, wait for analysis, print the reconciled tree
    Ingest(IngestArgs),

    /// Show root-detection score and contributing factors for a directory
    Score(ScoreArgs),

    /// Locate the project root under a directory and print its tree
    Tree(TreeArgs),
}

#[derive(clap::Args)]
struct IngestArgs {
    /// Path to the ZIP archive
    archive: PathBuf,

    /// Poll interval while waiting for the background job
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,

    /// Print the immediate tree and job id without waiting for analysis
    #[arg(long)]
    no_wait: bool,
}

#[derive(clap::Args)]
struct ScoreArgs {
    /// Directory to score
    dir: PathBuf,
}

#[derive(clap::Args)]
struct TreeArgs {
    /// Directory holding an extracted project
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Ingest(args) => ingest(args).await,
        Commands::Score(args) => score(args),
        Commands::Tree(args) => tree(args),
    }
}

async fn ingest(args: IngestArgs) -> Result<()> {
    let service = Codemap::new(Arc::new(MemoryStore::new()));

    let receipt = service
        .submit_archive(&args.archive)
        .await
        .with_context(|| format!("failed to ingest {}", args.archive.display()))?;

    if args.no_wait {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    eprintln!("job {} submitted, waiting for analysis...", receipt.job_id);
    loop {
        let view = service.job_status(&receipt.job_id).await?;
        match view.status {
            JobStatus::Completed => break,
            JobStatus::Failed => {
                anyhow::bail!(
                    "analysis failed: {}",
                    view.message.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            _ => tokio::time::sleep(Duration::from_millis(args.poll_ms)).await,
        }
    }

    let overview = service.reconciled_tree().await?;
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}

fn score(args: ScoreArgs) -> Result<()> {
    let score = score_dir(&args.dir);
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}

fn tree(args: TreeArgs) -> Result<()> {
    let root = locate_root(&args.dir);
    eprintln!("project root: {}", root.display());
    let tree = build_tree(&root)
        .with_context(|| format!("failed to walk {}", root.display()))?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}
