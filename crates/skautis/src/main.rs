// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `skautis` - talk to SkautIS web services from the command line.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

/// Command line client for the SkautIS web services.
#[derive(Parser, Debug)]
#[command(name = "skautis", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON file keeping login state between invocations.
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SkautIS login page URL.
    LoginUrl {
        /// Where SkautIS should send the user after login.
        #[arg(long)]
        backlink: Option<String>,
    },
    /// Print the SkautIS registration page URL.
    RegisterUrl {
        #[arg(long)]
        backlink: Option<String>,
    },
    /// Print the SkautIS logout URL for a token.
    LogoutUrl {
        #[arg(long)]
        token: String,
    },
    /// Check whether SkautIS is down for maintenance.
    Maintenance,
    /// List the supported web services.
    Services,
    /// Call a web service function and print the JSON result.
    Call {
        /// Service name or alias (user, org, app, events, ...).
        service: String,
        /// Function to call, e.g. UserDetail.
        function: String,
        /// Login token to call with.
        #[arg(long)]
        token: Option<String>,
        /// Argument as KEY=VALUE; VALUE is parsed as JSON when possible.
        #[arg(long = "arg", value_parser = commands::parse_key_value)]
        args: Vec<(String, serde_json::Value)>,
        /// Slash-separated path wrapping the arguments, e.g. Wrapper/Inner.
        #[arg(long)]
        cover: Option<String>,
        /// Print the recorded call log to stderr.
        #[arg(long)]
        debug_log: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Services = cli.command {
        commands::print_services();
        return ExitCode::SUCCESS;
    }

    let loaded = match &cli.config {
        Some(path) => skautis_config::load_and_validate_path(path),
        None => skautis_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            skautis_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    commands::init_tracing(&config.logging.level, cli.verbose);

    match commands::run(cli.command, &config, cli.session.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind_name(), error = %e, "command failed");
            eprintln!("skautis: {e}");
            ExitCode::FAILURE
        }
    }
}
