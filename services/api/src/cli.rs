use crate::commands::{run_export, run_stats, ExportArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sus_survey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SUS Survey",
    about = "Collect, score, and summarise System Usability Scale responses",
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
    /// Print per-question statistics for a results file
    Stats(StatsArgs),
    /// Write the stored results as a comma-separated spreadsheet export
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured results file
    #[arg(long)]
    pub(crate) results: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Stats(args) => run_stats(args),
        Command::Export(args) => run_export(args),
    }
}
