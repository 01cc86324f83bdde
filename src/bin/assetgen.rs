//! CLI for assetgen - branded image asset generation.

use assetgen::{BatchConfig, BatchDriver, GeminiClient, JobReport, StrategyKind};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "assetgen")]
#[command(about = "Generate branded image assets via the Gemini image API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every asset in the batch
    Run(BatchArgs),

    /// List the jobs a run would process
    Jobs(BatchArgs),
}

#[derive(Args)]
struct BatchArgs {
    /// Call shape to use (defaults to the config file's, then `content`)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// TOML batch config; built-in presets are used without it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model identifier override
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Content,
    Images,
    Stream,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Content => StrategyKind::Content,
            StrategyArg::Images => StrategyKind::Images,
            StrategyArg::Stream => StrategyKind::Stream,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            run_batch(args, cli.json).await?;
        }
        Commands::Jobs(args) => {
            list_jobs(args, cli.json)?;
        }
    }

    Ok(())
}

fn resolve_config(args: &BatchArgs) -> anyhow::Result<BatchConfig> {
    let strategy = args.strategy.map(StrategyKind::from);
    let mut config = match args.config {
        Some(ref path) => BatchConfig::load(path, strategy)?,
        None => BatchConfig::preset(strategy.unwrap_or_default()),
    };
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    Ok(config)
}

async fn run_batch(args: BatchArgs, json_output: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;

    // A missing key aborts here, before any job runs
    let client = GeminiClient::builder().model(&config.model).build()?;
    let driver = BatchDriver::new(config.strategy.into_strategy(client), &config);

    if !json_output {
        println!(
            "Generating {} assets via {} ({})...",
            config.jobs.len(),
            driver.strategy().name(),
            config.model
        );
    }

    let reports = driver.run(&config.jobs).await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    // Per-job failures are reported above; they never change the exit code
    Ok(())
}

fn print_report(report: &JobReport) {
    match (report.bytes_written, report.error.as_deref()) {
        (Some(bytes), _) => println!(
            "SUCCESS: {} ({} bytes, {} references)",
            report.output_path.display(),
            bytes,
            report.references_sent
        ),
        (None, Some(error)) => println!("FAILED: {}: {}", report.output_path.display(), error),
        (None, None) => println!("FAILED: {}", report.output_path.display()),
    }
}

fn list_jobs(args: BatchArgs, json_output: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;

    if json_output {
        let result = serde_json::json!({
            "strategy": config.strategy,
            "model": config.model,
            "delay_ms": config.delay.as_millis() as u64,
            "generation": config.generation,
            "jobs": config.jobs,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Strategy: {}  Model: {}  Delay: {:?}\n",
            config.strategy, config.model, config.delay
        );
        for (i, job) in config.jobs.iter().enumerate() {
            println!("{}. {}", i + 1, job.output_path.display());
            println!("   {}", job.prompt);
            for reference in &job.reference_paths {
                let status = if reference.exists() { "✓" } else { "✗" };
                println!("   {} {}", status, reference.display());
            }
        }
    }

    Ok(())
}
