// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HFED Sample: Ping Pong
//!
//! Runs the Ping and Pong federates against one in-process RTI.
//!
//! ## Running the Sample
//!
//! ```bash
//! cargo run --bin ping_pong
//! cargo run --bin ping_pong -- --rounds 50 --immediate --log-level debug
//! cargo run --bin ping_pong -- --config pingpong.toml --wait-timeout-secs 0
//! ```
//!
//! Flags given on the command line override the configuration file.

use clap::Parser;
use hfed::FederateConfiguration;
use hfed_samples_ping_pong::{default_base, run, Options, Overrides};
#[cfg(feature = "config-files")]
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ping_pong")]
#[command(about = "Ping and Pong federates on the in-process RTI")]
struct Args {
    /// Shared federate settings (TOML, or JSON by extension)
    #[cfg(feature = "config-files")]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pings to send
    #[arg(long, default_value_t = 10)]
    rounds: i32,

    /// Federation name
    #[arg(long)]
    federation: Option<String>,

    /// Deliver callbacks on an RTI thread instead of evoking them
    #[arg(long)]
    immediate: bool,

    /// Exchange without time management
    #[arg(long)]
    event_driven: bool,

    /// Time advance per step
    #[arg(long)]
    lookahead: Option<f64>,

    /// Upper bound for any blocking wait, in seconds (0 = unbounded)
    #[arg(long)]
    wait_timeout_secs: Option<u64>,

    /// Log filter (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            federation: self.federation.clone(),
            immediate: self.immediate,
            event_driven: self.event_driven,
            lookahead: self.lookahead,
            wait_timeout_secs: self.wait_timeout_secs,
        }
    }

    fn base(&self) -> hfed::Result<FederateConfiguration> {
        #[cfg(feature = "config-files")]
        if let Some(path) = &self.config {
            return FederateConfiguration::from_file(path);
        }
        Ok(default_base())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut base = match args.base() {
        Ok(base) => base,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    args.overrides().apply(&mut base);

    let options = Options {
        rounds: args.rounds,
        base,
    };

    match run(&options) {
        Ok(summary) => {
            println!(
                "Sent {} pings, received {} pongs ({} unanswered)",
                summary.sent,
                summary.replies.len(),
                summary.unanswered
            );
            println!("Completed - shutting down now");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Cannot proceed");
            ExitCode::FAILURE
        }
    }
}
