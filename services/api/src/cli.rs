use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use releaf_rewards::error::AppError;
use releaf_rewards::rewards::ScoringService;

use crate::infra::build_classifier;
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "ReLeaf Rewards",
    about = "Serve and exercise the carbon-credit reward scoring pipeline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a local image file and print the classification breakdown
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to the image file to score
    pub(crate) image: PathBuf,
    /// Optional classifier artifact; the built-in model is used when absent
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
    }
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let classifier = build_classifier(args.model.as_deref())?;
    let service = ScoringService::new(Arc::new(classifier));
    let bytes = std::fs::read(&args.image)?;

    println!("Scoring {}", args.image.display());
    match service.score_detailed(&bytes) {
        Ok(breakdown) => {
            println!(
                "  Channel means: R {:.2}, G {:.2}, B {:.2}",
                breakdown.features.avg_red,
                breakdown.features.avg_green,
                breakdown.features.avg_blue
            );
            println!("  Green ratio: {:.4}", breakdown.features.green_ratio);
            println!("  Category: {}", breakdown.category.label());
            println!("  Points: {}", breakdown.points);
        }
        Err(err) => {
            println!("  Scoring failed: {err}");
        }
    }
    Ok(())
}
