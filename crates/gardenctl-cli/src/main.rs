use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod commands;
mod session;

use session::{Paths, Session};

#[derive(Parser)]
#[command(
    name = "gardenctl",
    about = "gardenctl - navigate gardens, projects, seeds and shoots",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding config, target and kubeconfig cache [default: ~/.garden]
    #[arg(long, env = "GARDENCTL_HOME", global = true)]
    home: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::load(Paths::resolve(cli.home)?)?;

    let result = match cli.command {
        commands::Commands::Target(args) => commands::target::execute(args, &mut session).await,
        commands::Commands::Drop(args) => commands::drop::execute(args, &mut session).await,
        commands::Commands::Ls(args) => commands::ls::execute(args, &mut session).await,
        commands::Commands::Get(args) => commands::get::execute(args, &mut session).await,
        commands::Commands::Kubectl(args) => commands::kubectl::execute(args, &mut session).await,
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match e.downcast_ref::<commands::kubectl::KubectlExit>() {
            Some(exit) => Ok(ExitCode::from(exit.code())),
            None => Err(e),
        },
    }
}
