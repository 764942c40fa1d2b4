//! Command-line interface definition for the `skywatch` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;

/// Record service for weather readings and UFO sightings.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about)]
pub struct Cli {
    /// Path to a TOML config file (default: ./skywatch.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Errors only.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the REST, gRPC and gateway listeners until interrupted.
    Serve(ServeArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// REST listen address.
    #[arg(long)]
    pub http_addr: Option<String>,

    /// gRPC listen address.
    #[arg(long)]
    pub grpc_addr: Option<String>,

    /// Gateway listen address.
    #[arg(long)]
    pub gateway_addr: Option<String>,

    /// Do not start the HTTP-to-gRPC gateway.
    #[arg(long)]
    pub no_gateway: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }
}

impl ServeArgs {
    /// Override configuration values with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.http_addr {
            config.http.addr = addr.clone();
        }
        if let Some(addr) = &self.grpc_addr {
            config.grpc.addr = addr.clone();
            // Keep the gateway pointed at our own gRPC listener.
            config.gateway.upstream = format!("http://{addr}");
        }
        if let Some(addr) = &self.gateway_addr {
            config.gateway.addr = addr.clone();
        }
        if self.no_gateway {
            config.gateway.enabled = false;
        }
    }
}
