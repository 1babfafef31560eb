//! RegEasy issuing tool
//!
//! Vendor-side companion of the registration check:
//! 1. Print the fingerprint of the machine it runs on
//! 2. Issue codes bound to a customer's machine id
//! 3. Check codes and seal or open payload files
//!
//! Usage:
//!   regeasy issue --machine-id 1A2B-3C4D-5E6F-7081 --period 12

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use regeasy_crypto::{open_file, seal_file};
use regeasy_issuer::{build_record, describe, resolve_password, Cli, Command, PASSWORD_ENV};
use regeasy_license::{check_registration, current_fingerprint, issue, RegistrationConfig};
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let password = || {
        resolve_password(
            cli.password.clone(),
            std::env::var(PASSWORD_ENV).ok(),
            RegistrationConfig::discover,
        )
    };

    match &cli.command {
        Command::MachineId => {
            println!("{}", current_fingerprint());
        }
        Command::Issue(args) => {
            let (record, format) = build_record(args, Utc::now())?;
            debug!(?format, expires = %record.expired_time(), "issuing code");
            let code = issue(&record, format, &password()?).context("failed to issue code")?;
            println!("{code}");
        }
        Command::Verify(args) => {
            let expected = match &args.machine_id {
                Some(id) => id.clone(),
                None => current_fingerprint().to_string(),
            };
            let verdict = check_registration(&args.code, &password()?, &expected, Utc::now());
            match verdict.record() {
                Some(record) => {
                    println!("{}", verdict.message());
                    println!("{}", describe(record));
                }
                None => {
                    println!("{}", verdict.message());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::SealFile { input, output } => {
            let report = seal_file(input, output, &password()?)
                .with_context(|| format!("failed to seal {}", input.display()))?;
            info!("Sealed at {}", report.completed_at);
            println!("Original size: {} chars", report.original_size);
            println!("Sealed size:   {} chars", report.sealed_size);
        }
        Command::OpenFile { input, output } => {
            open_file(input, output, &password()?)
                .with_context(|| format!("failed to open {}", input.display()))?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
