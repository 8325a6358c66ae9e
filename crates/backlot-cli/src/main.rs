// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use backlot_api::Client;
use backlot_app::{AppState, SeriesId};
use config::Config;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::path::PathBuf;

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
            "load config {}; run `backlot --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let series_id = SeriesId::new(options.series.unwrap_or_else(|| config.default_series()));

    let mut state = AppState::default();
    if options.demo {
        if options.check_only {
            return Ok(());
        }
        let mut runtime = DemoRuntime::seeded();
        return backlot_tui::run_app(&mut state, &mut runtime, series_id);
    }

    let client = Client::new(
        config.api_base_url(),
        config.api_token(),
        config.api_timeout()?,
    )
    .with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/token/timeout values",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        return client.ping().with_context(|| {
            format!("catalog service health check against {}", client.base_url())
        });
    }

    let mut runtime = ApiRuntime::new(client);
    backlot_tui::run_app(&mut state, &mut runtime, series_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    series: Option<i64>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        series: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--series" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--series requires a series id"))?;
                let id: i64 = value.as_ref().parse().map_err(|_| {
                    anyhow::anyhow!("--series expects a numeric id, got {:?}", value.as_ref())
                })?;
                if id <= 0 {
                    return Err(anyhow::anyhow!("--series expects a positive id, got {id}"));
                }
                options.series = Some(id);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("backlot");
    println!("  --config <path>          Use a specific config path");
    println!("  --series <id>            Open this series instead of ui.default_series");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with a seeded in-memory catalog");
    println!("  --check                  Validate config and ping the catalog service");
    println!("  --help                   Show this help");
}
