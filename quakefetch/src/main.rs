//! `quakefetch`: one-shot catalog queries and monthly backfills.

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use quakefetch::backfill::{BackfillRequest, run_backfill};
use quakefetch::cli::{Cli, parse_date};
use quakefetch::exit_codes;
use quakefetch::fetch::{FetchRequest, run_fetch};
use quakefetch::io::config::{DEFAULT_CONFIG_FILE, QuakeConfig, load_config};
use quakefetch::io::session::ReqwestSession;
use quakefetch::logging;

fn main() {
    logging::init();
    let cli = Cli::try_parse().unwrap_or_else(|e| exit_usage(e));
    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_codes::for_error(&err));
    }
}

/// Usage errors share `INVALID` with bad dates and config; help and version
/// still exit 0.
fn exit_usage(err: clap::Error) -> ! {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.exit();
    }
    let _ = err.print();
    std::process::exit(exit_codes::INVALID);
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = resolve_config(cli)?;
    let session = ReqwestSession::new(&cfg.session_options())?;
    if cli.monthly {
        cmd_backfill(cli, &cfg, &session)
    } else {
        cmd_fetch(cli, &cfg, &session)
    }
}

fn resolve_config(cli: &Cli) -> Result<QuakeConfig> {
    let path = match &cli.config {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = load_config(&path)?;
    cli.apply_overrides(&mut cfg)?;
    debug!(base_url = %cfg.base_url, output_dir = %cfg.output_dir.display(), "config resolved");
    Ok(cfg)
}

fn cmd_backfill(cli: &Cli, cfg: &QuakeConfig, session: &ReqwestSession) -> Result<()> {
    let start = match &cli.filters.starttime {
        Some(value) => parse_date(value)?,
        None => cfg.backfill.start,
    };
    let end = match &cli.filters.endtime {
        Some(value) => parse_date(value)?,
        None => cfg.backfill.end,
    };
    let extra_params = cli.filters.to_backfill_params();

    println!("backfill: start={} end={}", start, end);
    let outcome = run_backfill(
        session,
        &BackfillRequest {
            base_url: &cfg.base_url,
            start,
            end,
            extra_params: &extra_params,
            output_dir: &cfg.output_dir,
        },
        |month| {
            println!(
                "backfill: month={} path={} requests={} splits={}",
                month.range,
                month.path.display(),
                month.requests,
                month.splits
            );
        },
    )?;
    println!(
        "backfill: complete months={} requests={}",
        outcome.months.len(),
        outcome.total_requests()
    );
    Ok(())
}

fn cmd_fetch(cli: &Cli, cfg: &QuakeConfig, session: &ReqwestSession) -> Result<()> {
    let params = cli.filters.to_query_params();
    let path = run_fetch(
        session,
        &FetchRequest {
            base_url: &cfg.base_url,
            params: &params,
            output: cli.output.as_deref(),
            output_dir: &cfg.output_dir,
        },
        Utc::now(),
    )?;
    println!("Data saved to {}", path.display());
    Ok(())
}
