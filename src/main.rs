//! `skywatch` - run the record service or inspect its configuration.

#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use skywatch::cli::{Cli, Command, ServeArgs};
use skywatch::logging::init_logging;
use skywatch::{server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(args) => serve(config, &args).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(mut config: Config, args: &ServeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    config
        .validate()
        .context("command-line flags produced an invalid configuration")?;

    server::run(&config, server::shutdown_signal())
        .await
        .context("server failed")
}
