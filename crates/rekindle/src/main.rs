// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rekindle - a proactive re-engagement agent.
//!
//! This is the binary entry point. The engine itself lives in the
//! workspace library crates; this binary wires it to the Anthropic
//! provider and a console channel.

mod console;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Rekindle - a proactive re-engagement agent.
#[derive(Parser, Debug)]
#[command(name = "rekindle", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the proactive scheduler with the console channel.
    Serve,
    /// Print the effective merged configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match rekindle_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            rekindle_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("rekindle serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("failed to render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("rekindle: use --help for available commands");
        }
    }
}
