// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hfedctl - inspect, validate and generate federate configuration files.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hfed::{ConfigFormat, DataType, FederateConfiguration};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hfedctl")]
#[command(about = "HFED federate configuration tool")]
#[command(version)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace or an EnvFilter directive)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a configuration file and check it can drive a federate
    Validate {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write a starter configuration
    GenConfig {
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (from the output extension if omitted, else TOML)
        #[arg(long, value_enum)]
        format: Option<Format>,

        #[arg(long, default_value = "MyFederate")]
        federate_name: String,

        #[arg(long, default_value = "MyFederateType")]
        federate_type: String,

        #[arg(long, default_value = "MyFederation")]
        federation_name: String,
    },

    /// Print the effective configuration, defaults included
    Show {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

impl From<Format> for ConfigFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => ConfigFormat::Toml,
            Format::Json => ConfigFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Validate { input } => cmd_validate(&input),
        Commands::GenConfig {
            output,
            format,
            federate_name,
            federate_type,
            federation_name,
        } => {
            let config = starter_config(&federate_name, &federate_type, &federation_name);
            cmd_gen_config(&config, output.as_deref(), format)
        }
        Commands::Show { input } => cmd_show(&input),
    }
}

fn cmd_validate(input: &Path) -> anyhow::Result<()> {
    let config = FederateConfiguration::from_file(input)
        .with_context(|| format!("validating {}", input.display()))?;
    println!(
        "[OK] {}: federate '{}' ({}) for federation '{}'",
        input.display(),
        config.federate_name(),
        config.federate_type(),
        config.federation_name()
    );
    println!(
        "     {} object classes, {} interaction classes",
        config.object_classes().count(),
        config.interaction_classes().count()
    );
    Ok(())
}

/// A configuration publishing and subscribing one example interaction.
fn starter_config(federate_name: &str, federate_type: &str, federation_name: &str) -> FederateConfiguration {
    let mut config = FederateConfiguration::new(federate_name, federate_type, federation_name);
    config
        .set_can_create_federation(true)
        .add_published_interaction("Ping")
        .add_interaction_parameter("Ping", "count", DataType::Int)
        .add_subscribed_interaction("Pong")
        .add_interaction_parameter("Pong", "count", DataType::Int);
    config
}

fn cmd_gen_config(
    config: &FederateConfiguration,
    output: Option<&Path>,
    format: Option<Format>,
) -> anyhow::Result<()> {
    let format = match (format, output) {
        (Some(format), _) => format.into(),
        (None, Some(path)) => ConfigFormat::from_path(path),
        (None, None) => ConfigFormat::Toml,
    };
    let text = config.render(format)?;

    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {:?} configuration to {}", format, path.display());
            println!("[OK] Configuration written to: {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_show(input: &Path) -> anyhow::Result<()> {
    let config = FederateConfiguration::from_file(input)
        .with_context(|| format!("loading {}", input.display()))?;
    print!("{}", describe(&config));
    Ok(())
}

fn describe(config: &FederateConfiguration) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("federate:      {} ({})", config.federate_name(), config.federate_type()));
    line(format!("federation:    {}", config.federation_name()));
    line(format!(
        "join:          create={} attempts={} interval={}s late_joiner={}",
        config.can_create_federation(),
        config.max_join_attempts(),
        config.join_retry_interval_secs(),
        config.is_late_joiner()
    ));
    let (evoke_min, evoke_max) = config.evoke_window();
    line(format!(
        "time:          stepped={} lookahead={} step={} evoked={} window=[{}, {}]",
        config.is_time_stepped(),
        config.lookahead(),
        config.step_size(),
        config.are_callbacks_evoked(),
        evoke_min,
        evoke_max
    ));
    line(format!(
        "waits:         timeout={} poll={:?}",
        config
            .wait_timeout()
            .map_or_else(|| "none".to_string(), |t| format!("{:?}", t)),
        config.poll_interval()
    ));
    line(format!(
        "shutdown:      resign={:?} sync_before_resign={} sim_control={}",
        config.resign_action(),
        config.sync_before_resign(),
        config.sim_control()
    ));
    for module in config.fom_modules() {
        line(format!("fom module:    {}", module));
    }
    for module in config.som_modules() {
        line(format!("som module:    {}", module));
    }
    for class in config.object_classes() {
        line(format!("object class:  {} [{}]", class.name, class.sharing));
        for attribute in class.attributes() {
            line(format!(
                "  attribute:   {}: {} [{}]",
                attribute.name, attribute.data_type, attribute.sharing
            ));
        }
    }
    for class in config.interaction_classes() {
        line(format!("interaction:   {} [{}]", class.name, class.sharing));
        for parameter in class.parameters() {
            line(format!("  parameter:   {}: {}", parameter.name, parameter.data_type));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_config_is_valid_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starter.toml");
        let config = starter_config("A", "B", "C");
        cmd_gen_config(&config, Some(&path), None).unwrap();

        let loaded = FederateConfiguration::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        cmd_validate(&path).unwrap();
    }

    #[test]
    fn test_gen_config_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starter.json");
        cmd_gen_config(&starter_config("A", "B", "C"), Some(&path), None).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with('{'));
    }

    #[test]
    fn test_describe_lists_declarations() {
        let text = describe(&starter_config("Ping", "PingFederate", "PingPong"));
        assert!(text.contains("federate:      Ping (PingFederate)"));
        assert!(text.contains("interaction:   Ping [publish]"));
        assert!(text.contains("  parameter:   count: int"));
        assert!(text.contains("interaction:   Pong [subscribe]"));
        assert!(text.contains("timeout=none"));
    }
}
