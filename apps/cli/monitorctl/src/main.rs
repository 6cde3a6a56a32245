use monitorctl::cli::{Cli, Commands};
use monitorctl::commands;
use monitorctl::error::CliError;
use monitorctl::logger::initialize as LoggerInitialize;

use monitor_client::{CallContext, Client};

use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    LoggerInitialize(cli.log_level(), cli.log_file.as_deref())?;

    let client = Client::new(cli.client_config()?)?;

    let mut ctx = CallContext::new();
    if let Some(deadline) = cli.deadline {
        ctx = ctx.with_timeout(deadline);
    }

    let canceller = ctx.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the in-flight call");
            canceller.cancel();
        }
    });

    match &cli.command {
        Commands::Request(args) => {
            let output = commands::request::run(&client, &ctx, args).await?;
            println!("{output}");
        }
    }

    debug!("Done");
    Ok(())
}
