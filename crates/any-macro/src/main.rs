//! any-macro: record command sequences as named macros and replay them in
//! strict order.

mod app;
mod cli;
mod config;
mod console_bus;
mod dialogs;
mod error;
mod host_event;
mod later;
mod script;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::{Session, RECORD_TOGGLE_ID},
    cli::Cli,
    console_bus::ConsoleBus,
    dialogs::ConsoleDialogs,
    error::{AppError, Result},
    host_event::HostEvent,
    later::run_later,
};

use crate::config::Config;

use std::{process, sync::mpsc, time::Duration};

use any_macro_core::JsonFileStore;
use clap::Parser;
use tracing::error;

/// Extra slack on top of command latency before a pump gives up waiting.
const PUMP_GRACE_FLOOR_MS: u64 = 250;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("any_macro=debug")
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e, "Session failed");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let macros_path = match cli.macros_file {
        Some(path) => path,
        None => config.macros_path()?,
    };

    let latency = Duration::from_millis(config.playback.command_latency_ms);
    let pump_grace = latency * 4 + Duration::from_millis(PUMP_GRACE_FLOOR_MS);

    let (tx, rx) = mpsc::channel();
    let bus = ConsoleBus::new(tx, latency);

    let mut session = Session::new(
        Box::new(bus),
        Box::new(ConsoleDialogs),
        Box::new(ConsoleDialogs),
        Box::new(JsonFileStore::new(macros_path)),
        rx,
        config.recording.consecutive_block,
        pump_grace,
    )?;

    match cli.script {
        Some(path) => session.run_script(&path),
        None => session.run_repl(),
    }
}
