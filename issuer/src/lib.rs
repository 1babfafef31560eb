//! Argument handling for the `regeasy` issuing tool.
//!
//! The binary only wires these pieces to stdout; everything that decides what
//! gets issued lives here.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use clap::{Args, Parser, Subcommand};
use regeasy_license::{
    derive_expiry, format_machine_id, parse_structured, CredentialRecord, LicenseResult,
    PayloadFormat, RegistrationConfig, STRUCTURED_TS_FORMAT,
};
use std::path::PathBuf;

/// Environment variable consulted when `--password` is not given.
pub const PASSWORD_ENV: &str = "REGEASY_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "regeasy")]
#[command(about = "Issue and check offline registration codes")]
pub struct Cli {
    /// Password the codes are sealed under
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print this machine's fingerprint
    MachineId,
    /// Issue a registration code
    Issue(IssueArgs),
    /// Check a registration code
    Verify(VerifyArgs),
    /// Seal a text file
    SealFile { input: PathBuf, output: PathBuf },
    /// Open a sealed file
    OpenFile { input: PathBuf, output: PathBuf },
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueArgs {
    /// Machine id the code is bound to
    #[arg(long)]
    pub machine_id: String,

    /// Validity in months; 0 means unlimited
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub period: i32,

    /// Opaque quota metadata
    #[arg(long)]
    pub quota: Option<String>,

    /// Creation time, `yyyy-MM-dd HH:mm:ss` (UTC); defaults to now
    #[arg(long)]
    pub created: Option<String>,

    /// Emit the pipe-delimited format
    #[arg(long)]
    pub legacy: bool,

    /// Literal expiry for legacy codes; defaults to the period rule
    #[arg(long, requires = "legacy")]
    pub expires: Option<String>,

    /// Use the machine id verbatim (installation ids)
    #[arg(long)]
    pub raw_id: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// The registration code
    pub code: String,

    /// Expected machine id; defaults to this machine
    #[arg(long)]
    pub machine_id: Option<String>,
}

/// Picks the password from the flag, then the environment, then the
/// configuration file. The first non-empty value wins.
pub fn resolve_password<F>(
    flag: Option<String>,
    env: Option<String>,
    discover: F,
) -> Result<String>
where
    F: FnOnce() -> LicenseResult<RegistrationConfig>,
{
    if let Some(password) = flag.into_iter().chain(env).find(|p| !p.is_empty()) {
        return Ok(password);
    }

    let config = discover().context("failed to load configuration")?;
    if config.password.is_empty() {
        bail!("no password given; use --password, {PASSWORD_ENV} or config.json");
    }
    Ok(config.password)
}

/// Builds the record and payload format described by `args`.
pub fn build_record(
    args: &IssueArgs,
    now: DateTime<Utc>,
) -> Result<(CredentialRecord, PayloadFormat)> {
    if args.machine_id.trim().is_empty() {
        bail!("machine id must not be empty");
    }
    let machine_id = if args.raw_id {
        args.machine_id.trim().to_string()
    } else {
        format_machine_id(&args.machine_id)
    };

    let created = match &args.created {
        Some(text) => parse_created(text)?,
        None => now.trunc_subsecs(0),
    };

    let quota = args.quota.clone().unwrap_or_default();
    if !args.legacy {
        let record =
            CredentialRecord::with_period(machine_id, args.period, created)?.with_quota(quota);
        return Ok((record, PayloadFormat::Structured));
    }

    let expires = match &args.expires {
        Some(text) => parse_instant(text)?,
        None => derive_expiry(created, args.period)?,
    };
    if expires <= created {
        bail!("expiry {expires} is not after creation {created}");
    }
    let record = CredentialRecord::new(machine_id, args.period, created, expires).with_quota(quota);
    Ok((record, PayloadFormat::Delimited))
}

/// Renders the fields of an accepted record, one per line.
#[must_use]
pub fn describe(record: &CredentialRecord) -> String {
    let period = if record.is_unlimited() {
        "unlimited".to_string()
    } else {
        format!("{} months", record.period_type())
    };
    let mut lines = vec![
        format!("Machine:  {}", record.machine_id()),
        format!("Period:   {period}"),
        format!("Created:  {}", record.create_time().format(STRUCTURED_TS_FORMAT)),
        format!("Expires:  {}", record.expired_time().format(STRUCTURED_TS_FORMAT)),
        format!("Format:   {:?}", record.format()),
    ];
    if let Some(quota) = record.quota() {
        lines.push(format!("Quota:    {quota}"));
    }
    lines.join("\n")
}

fn parse_created(text: &str) -> Result<DateTime<Utc>> {
    parse_structured(text)
        .with_context(|| format!("--created must look like 2024-01-31 13:45:00, got {text:?}"))
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", STRUCTURED_TS_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .with_context(|| format!("unrecognised timestamp {text:?}"))
}
