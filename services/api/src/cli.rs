use crate::demo::{run_demo, run_score, run_transcript, DemoArgs, ScoreArgs, TranscriptArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leadqual::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Qualification Service",
    about = "Score, call, and qualify real estate leads from the command line",
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
    /// Score a completed questionnaire without starting the server
    Score(ScoreArgs),
    /// Extract score and intent signals from a call transcript
    Transcript(TranscriptArgs),
    /// Run an end-to-end CLI demo covering intake, calling, and hand-off
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Transcript(args) => run_transcript(args),
        Command::Demo(args) => run_demo(args),
    }
}
