// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;
mod seed;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use fleetbook_app::AppState;
use logging::Verbosity;
use runtime::SessionRuntime;
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `fleetbook --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let poll_interval = config.poll_interval()?;

    let seed_path = options.seed_path.clone().or_else(|| config.seed_path());
    if options.check_only {
        let store = seed::load_seed(seed_path.as_deref())?;
        println!(
            "ok: {} vehicles, window {}, poll every {:?}",
            store.len(),
            config.notification_window(),
            poll_interval
        );
        return Ok(());
    }

    let log_file = config.log_file()?;
    logging::init_logging(
        &log_file,
        &config.log_level(),
        Verbosity::from_flag(options.verbose),
    )?;
    info!(config = %options.config_path.display(), "starting fleetbook");
    let store = seed::load_seed(seed_path.as_deref())?;

    let mut state = AppState::new(OffsetDateTime::now_utc().date());
    state.language = config.language();
    state.user_name = config.user_name().to_owned();

    let mut runtime = SessionRuntime::new(store, config.notification_window(), poll_interval);
    fleetbook_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    seed_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    verbose: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        seed_path: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        verbose: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => options.config_path = flag_path(&mut iter, "--config", "a file path")?,
            "--seed" => {
                options.seed_path = Some(flag_path(&mut iter, "--seed", "a JSON file path")?);
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-example-config" => options.print_example = true,
            "--check" => options.check_only = true,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options")
            }
        }
    }

    Ok(options)
}

fn flag_path<I, S>(iter: &mut I, flag: &str, expected: &str) -> Result<PathBuf>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    iter.next()
        .map(|value| PathBuf::from(value.as_ref()))
        .ok_or_else(|| anyhow!("{flag} requires {expected}"))
}

fn print_help() {
    println!("fleetbook");
    println!("  --config <path>          Use a specific config path");
    println!("  --seed <path>            Load vehicles from a JSON file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config + seed data, then exit");
    println!("  --verbose, -v            Log at debug level");
    println!("  --help                   Show this help");
}
