mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rsctl_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "rsctl", &mut std::io::stdout());
            Ok(())
        }

        // Everything else runs inside one session
        cmd => {
            let controller_config = config::build_controller_config(&cli.global)?;
            let controller = Controller::new(controller_config)?;
            controller.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &cli.global).await;

            if let Err(e) = controller.disconnect().await {
                tracing::warn!(error = %e, "logout failed");
            }
            result
        }
    }
}
