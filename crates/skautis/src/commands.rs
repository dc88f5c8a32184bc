// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

use std::path::Path;
use std::sync::{Arc, PoisonError};

use serde_json::{Value, json};
use tracing::debug;

use skautis::{
    CallArgs, FileSession, MemorySession, SUPPORTED_SERVICES, SessionAdapter, Skautis,
    SkautisError, SkautisRegistry,
};
use skautis_config::SkautisConfig;

use crate::Commands;

/// Installs the stderr subscriber; `RUST_LOG` overrides the configured level.
pub fn init_tracing(level: &str, verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skautis={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `KEY=VALUE`, reading VALUE as JSON and falling back to a string.
pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn print_services() {
    for service in SUPPORTED_SERVICES {
        println!("{service}");
    }
}

fn open_session(path: Option<&Path>) -> Result<Arc<dyn SessionAdapter>, SkautisError> {
    Ok(match path {
        Some(path) => Arc::new(FileSession::open(path)?),
        None => Arc::new(MemorySession::new()),
    })
}

fn print_json(value: &Value) -> Result<(), SkautisError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SkautisError::Internal(format!("cannot encode output: {e}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn run(command: Commands, config: &SkautisConfig, session: Option<&Path>) -> Result<(), SkautisError> {
    let registry = SkautisRegistry::soap(Some(open_session(session)?))?;
    let instance = registry.instance_for(config.service.to_config()?)?;
    let mut skautis = instance.lock().unwrap_or_else(PoisonError::into_inner);

    match command {
        Commands::LoginUrl { backlink } => println!("{}", skautis.login_url(backlink.as_deref())),
        Commands::RegisterUrl { backlink } => {
            println!("{}", skautis.register_url(backlink.as_deref()))
        }
        Commands::LogoutUrl { token } => {
            skautis
                .user_mut()
                .update_login_data(Some(token), None, None, None)?;
            println!("{}", skautis.logout_url());
        }
        Commands::Maintenance => {
            let maintenance = skautis.is_maintenance();
            print_json(&json!({ "maintenance": maintenance }))?;
        }
        Commands::Services => print_services(),
        Commands::Call {
            service,
            function,
            token,
            args,
            cover,
            debug_log,
        } => {
            if debug_log {
                skautis.enable_debug_log();
            }
            if let Some(token) = token {
                skautis
                    .user_mut()
                    .update_login_data(Some(token), None, None, None)?;
            }
            let mut call_args = args
                .into_iter()
                .fold(CallArgs::new(), |acc, (key, value)| acc.with(key, value));
            if let Some(cover) = cover {
                call_args = call_args.covered(cover);
            }

            let result = call(&skautis, &service, &function, call_args);
            if debug_log {
                print_debug_log(&skautis)?;
            }
            print_json(&result?)?;
        }
    }
    Ok(())
}

fn call(skautis: &Skautis, service: &str, function: &str, args: CallArgs) -> Result<Value, SkautisError> {
    debug!(service, function, "calling from command line");
    skautis.get_web_service(service)?.call(function, args)
}

fn print_debug_log(skautis: &Skautis) -> Result<(), SkautisError> {
    let log = serde_json::to_string_pretty(&skautis.debug_log())
        .map_err(|e| SkautisError::Internal(format!("cannot encode debug log: {e}")))?;
    eprintln!("{log}");
    Ok(())
}
