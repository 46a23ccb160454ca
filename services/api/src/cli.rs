use crate::commands::{run_analyze, run_models, run_render, AnalyzeArgs, ModelsArgs, RenderArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use desinfo::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "DESINFO Reporter",
    about = "Classify political statements and produce DESINFO score reports",
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
    /// List the models the classification service currently offers
    Models(ModelsArgs),
    /// Classify statements, print the summary, and write report files
    Analyze(AnalyzeArgs),
    /// Render reports from previously exported records without reclassifying
    Render(RenderArgs),
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Models(args) => run_models(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Render(args) => run_render(args),
    }
}
