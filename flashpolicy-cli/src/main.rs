//! flashpolicy - serve, render and check Flash cross-domain policy files.
//!
//! # Commands
//!
//! - `flashpolicy serve` - Serve the configured policies over HTTP
//! - `flashpolicy render` - Print a policy document to stdout
//! - `flashpolicy check <file>` - Parse a policy file and list its elements
//! - `flashpolicy config <file>` - Validate a configuration file

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod error;

use commands::{check, config, render, serve};
use error::CliResult;

/// Flash cross-domain policy tools
#[derive(Parser)]
#[command(name = "flashpolicy")]
#[command(version)]
#[command(about = "Serve, render and check Flash cross-domain policy files")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve policy files over HTTP
    #[command(alias = "s")]
    Serve(ServeArgs),

    /// Print a policy document to stdout
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Parse a policy file and list its elements
    Check {
        /// Policy XML file
        file: PathBuf,
    },

    /// Validate a configuration file
    #[command(alias = "c")]
    Config {
        /// Configuration file (.toml or .json)
        file: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Configuration file (.toml or .json)
    #[arg(short, long, env = "FLASHPOLICY_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct RenderArgs {
    /// Domain allowed to access the server (repeatable)
    #[arg(short, long = "domain", value_name = "DOMAIN")]
    domains: Vec<String>,

    /// Ports the domains may connect to, e.g. "80,443" or "*"
    #[arg(long)]
    to_ports: Option<String>,

    /// Value of the `secure` attribute on each domain
    #[arg(long)]
    secure: Option<bool>,

    /// Deny all access
    #[arg(long)]
    no_access: bool,

    /// Meta-policy, emitted before the domains
    #[arg(long, value_name = "POLICY")]
    site_control: Option<String>,
}

impl From<RenderArgs> for render::RenderOptions {
    fn from(args: RenderArgs) -> Self {
        Self {
            domains: args.domains,
            to_ports: args.to_ports,
            secure: args.secure,
            no_access: args.no_access,
            site_control: args.site_control,
        }
    }
}

impl From<ServeArgs> for serve::ServeOptions {
    fn from(args: ServeArgs) -> Self {
        Self {
            config: args.config,
            host: args.host,
            port: args.port,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    flashpolicy_log::init();
    if cli.verbose {
        flashpolicy_log::set_debug(true);
    }

    let result: CliResult<()> = match cli.command {
        Commands::Serve(args) => serve::execute(&args.into()).await,
        Commands::Render(args) => render::execute(&args.into()),
        Commands::Check { file } => check::execute(&file),
        Commands::Config { file } => config::execute(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
