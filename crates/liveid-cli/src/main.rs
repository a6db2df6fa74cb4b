use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod simulate;
mod verify;

#[derive(Parser)]
#[command(
    name = "liveid",
    version,
    about = "liveid eKYC tools — verification submission and liveness trace simulation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a reference image and a selfie to the verification API
    Verify(verify::VerifyArgs),
    /// Replay a recorded event trace through the liveness state machine
    Simulate(simulate::SimulateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Verify(args) => verify::run(args).await,
        Command::Simulate(args) => simulate::run(args),
    }
}
