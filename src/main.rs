// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Publish | Align | Exists | NextVersion | Options | Configs
//! ```

use std::process::ExitCode;

use tm_rs::cli::global::GlobalOptions;
use tm_rs::cli::{self, Command};
use tm_rs::cmd::align::run_align_command;
use tm_rs::cmd::config::{run_configs_command, run_options_command};
use tm_rs::cmd::publish::run_publish_command;
use tm_rs::cmd::query::{run_exists_command, run_next_version_command};
use tm_rs::config::Config;
use tm_rs::config::loader::ConfigLoader;
use tm_rs::config::types::GlobalConfig;
use tm_rs::logging::init_logging;
use tm_rs::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let config = load_config(&cli.global);

    let log_config = build_log_config(config.as_ref().ok().map(|c| &c.global), &cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

/// The merged `[global]` section when the config loaded, the raw flags
/// otherwise.
fn build_log_config(global: Option<&GlobalConfig>, flags: &GlobalOptions) -> LogConfig {
    if let Some(global) = global {
        return LogConfig::builder()
            .with_console_level(global.output_log_level)
            .with_file_level(global.file_log_level)
            .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
            .with_json(global.log_json)
            .build();
    }

    let console_level = flags
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = flags
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(flags.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json(flags.log_json)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: tm_rs::error::Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Configs) => {
            let loader = build_config_loader(&cli.global);
            run_configs_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Publish(args)) => match config {
            Ok(config) => run_publish_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Align(args)) => match config {
            Ok(config) => run_align_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Exists(args)) => match config {
            Ok(config) => run_exists_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::NextVersion(args)) => match config {
            Ok(config) => run_next_version_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional("tm.toml");
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix("TM")
}

fn load_config(global: &GlobalOptions) -> tm_rs::error::Result<Config> {
    let mut loader = build_config_loader(global);
    for assignment in global.to_config_overrides() {
        loader = loader.set_assignment(&assignment)?;
    }
    loader.build()
}
