//! Machine fingerprinting for registration binding.
//!
//! A platform-specific raw identity string is hashed with SHA-256, the first
//! 8 bytes are hex-encoded and the result is grouped as
//! `XXXX-XXXX-XXXX-XXXX`. Codes already issued are bound to this exact
//! reduction, so none of its steps may change.
//!
//! Mobile hosts that expose an installation identifier use it verbatim and
//! skip the reduction (see [`Fingerprint::Installation`]).

use crate::probe::run_with_timeout;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Length of the fingerprint payload without separators.
pub const FINGERPRINT_LEN: usize = 16;

/// Bytes of the digest kept for the fingerprint.
const DIGEST_PREFIX_LEN: usize = 8;

/// Upper bound on any external command used for identity.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Sentinel used when the installation-id provider returns nothing.
pub const INSTALLATION_UNKNOWN: &str = "ANDROID_UNKNOWN";

/// Sentinel used when the installation-id provider fails.
pub const INSTALLATION_ERROR: &str = "ANDROID_ERROR";

const MACHINE_ID_PATH: &str = "/etc/machine-id";
const DBUS_MACHINE_ID_PATH: &str = "/var/lib/dbus/machine-id";

/// Supplies the OS installation identifier on mobile hosts.
pub type InstallationIdProvider =
    Arc<dyn Fn() -> Result<Option<String>, Box<dyn Error + Send + Sync>> + Send + Sync>;

/// A machine fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Hashed and grouped identity, `XXXX-XXXX-XXXX-XXXX`.
    Grouped(String),
    /// Raw installation identifier, compared as text.
    Installation(String),
}

impl Fingerprint {
    /// Returns the fingerprint text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Grouped(s) | Self::Installation(s) => s,
        }
    }

    /// Returns true if `machine_id` names this machine (case-insensitive).
    #[must_use]
    pub fn matches(&self, machine_id: &str) -> bool {
        crate::policy::machine_ids_match(self.as_str(), machine_id)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the raw identity string comes from.
#[derive(Clone)]
pub enum RawIdentitySource {
    /// Processor id, baseboard serial and first disk serial (Windows CIM).
    HardwareQuery,
    /// A machine-id file, with a secondary path tried when the first is unreadable.
    MachineIdFile { primary: PathBuf, secondary: PathBuf },
    /// Trimmed output of a system utility.
    PlatformUtility {
        program: String,
        args: Vec<String>,
        timeout: Duration,
    },
    /// OS installation identifier supplied by the host application.
    Installation(InstallationIdProvider),
    /// The host name.
    HostName,
}

impl fmt::Debug for RawIdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardwareQuery => f.write_str("HardwareQuery"),
            Self::MachineIdFile { primary, secondary } => f
                .debug_struct("MachineIdFile")
                .field("primary", primary)
                .field("secondary", secondary)
                .finish(),
            Self::PlatformUtility {
                program,
                args,
                timeout,
            } => f
                .debug_struct("PlatformUtility")
                .field("program", program)
                .field("args", args)
                .field("timeout", timeout)
                .finish(),
            Self::Installation(_) => f.write_str("Installation(..)"),
            Self::HostName => f.write_str("HostName"),
        }
    }
}

impl RawIdentitySource {
    /// Selects the source for the running platform.
    ///
    /// Mobile platforms need the host to supply an installation-id provider
    /// through [`RawIdentitySource::installation`]; without one they fall back
    /// to the host name.
    #[must_use]
    pub fn detect() -> Self {
        let source = if cfg!(target_os = "windows") {
            Self::HardwareQuery
        } else if cfg!(target_os = "macos") {
            Self::ioreg()
        } else if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::HostName
        } else if cfg!(unix) {
            Self::machine_id_file()
        } else {
            Self::HostName
        };
        debug!(?source, "selected identity source");
        source
    }

    /// The systemd/dbus machine-id files.
    #[must_use]
    pub fn machine_id_file() -> Self {
        Self::MachineIdFile {
            primary: PathBuf::from(MACHINE_ID_PATH),
            secondary: PathBuf::from(DBUS_MACHINE_ID_PATH),
        }
    }

    /// The macOS platform expert device dump.
    #[must_use]
    pub fn ioreg() -> Self {
        Self::PlatformUtility {
            program: "ioreg".to_string(),
            args: vec![
                "-rd1".to_string(),
                "-c".to_string(),
                "IOPlatformExpertDevice".to_string(),
            ],
            timeout: PROBE_TIMEOUT,
        }
    }

    /// An installation-id source backed by `provider`.
    pub fn installation<F>(provider: F) -> Self
    where
        F: Fn() -> Result<Option<String>, Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
    {
        Self::Installation(Arc::new(provider))
    }

    /// Collects the raw identity string. Never fails.
    ///
    /// Any source that yields nothing usable falls back to the host name.
    #[must_use]
    pub fn collect(&self) -> String {
        let raw = match self {
            Self::HardwareQuery => collect_hardware(),
            Self::MachineIdFile { primary, secondary } => read_machine_id(primary, secondary),
            Self::PlatformUtility {
                program,
                args,
                timeout,
            } => {
                let mut command = Command::new(program);
                command.args(args);
                run_with_timeout(command, *timeout)
            }
            Self::Installation(provider) => return installation_id(&**provider),
            Self::HostName => None,
        };

        match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!("identity source yielded nothing, using host name");
                host_name()
            }
        }
    }
}

/// Computes fingerprints from a fixed identity source.
#[derive(Debug, Clone)]
pub struct MachineIdGenerator {
    source: RawIdentitySource,
}

impl MachineIdGenerator {
    /// Uses the source detected for this platform.
    #[must_use]
    pub fn detect() -> Self {
        Self::with_source(RawIdentitySource::detect())
    }

    /// Uses an explicit source.
    #[must_use]
    pub fn with_source(source: RawIdentitySource) -> Self {
        Self { source }
    }

    /// Returns the identity source.
    #[must_use]
    pub fn source(&self) -> &RawIdentitySource {
        &self.source
    }

    /// Computes the fingerprint of this machine.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let raw = self.source.collect();
        match self.source {
            RawIdentitySource::Installation(_) => Fingerprint::Installation(raw),
            _ => Fingerprint::Grouped(format_machine_id(&reduce_identity(&raw))),
        }
    }
}

/// Returns the fingerprint of the running machine.
#[must_use]
pub fn current_fingerprint() -> Fingerprint {
    MachineIdGenerator::detect().fingerprint()
}

/// Hashes a raw identity into 16 uppercase hex characters.
#[must_use]
pub fn reduce_identity(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode_upper(&digest[..DIGEST_PREFIX_LEN])
}

/// Normalizes an id into `XXXX-XXXX-XXXX-XXXX`.
///
/// Non-alphanumeric characters are dropped, the rest uppercased, then the
/// value is right-padded with `0` or truncated to 16 characters.
#[must_use]
pub fn format_machine_id(id: &str) -> String {
    let mut chars: Vec<char> = id
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(upper_one)
        .take(FINGERPRINT_LEN)
        .collect();
    chars.resize(FINGERPRINT_LEN, '0');

    let mut grouped = String::with_capacity(FINGERPRINT_LEN + 3);
    for (i, group) in chars.chunks(4).enumerate() {
        if i > 0 {
            grouped.push('-');
        }
        grouped.extend(group);
    }
    grouped
}

/// Uppercases `c` when that yields exactly one character, e.g. `ß` stays `ß`.
fn upper_one(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Combines hardware identifiers, or `None` when neither processor nor
/// baseboard is known.
pub(crate) fn combine_hardware(cpu: &str, board: &str, disk: &str) -> Option<String> {
    if cpu.trim().is_empty() && board.trim().is_empty() {
        return None;
    }
    Some(format!("{cpu}|{board}|{disk}"))
}

fn collect_hardware() -> Option<String> {
    let cpu = cim_property("Win32_Processor", "ProcessorId");
    let board = cim_property("Win32_BaseBoard", "SerialNumber");
    let disk = cim_property("Win32_DiskDrive", "SerialNumber");
    combine_hardware(&cpu, &board, &disk)
}

/// Returns the first non-empty value of a CIM property, or an empty string.
fn cim_property(class: &str, property: &str) -> String {
    let script = format!(
        "Get-CimInstance -ClassName {class} -ErrorAction SilentlyContinue | \
         ForEach-Object {{ $_.{property} }} | Where-Object {{ $_ }} | Select-Object -First 1"
    );
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
    hide_console(&mut command);

    run_with_timeout(command, PROBE_TIMEOUT).unwrap_or_else(|| {
        warn!(class, property, "hardware query returned nothing");
        String::new()
    })
}

#[cfg(windows)]
fn hide_console(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_command: &mut Command) {}

fn read_machine_id(primary: &Path, secondary: &Path) -> Option<String> {
    std::fs::read_to_string(primary)
        .or_else(|e| {
            debug!("{} unreadable ({e}), trying {}", primary.display(), secondary.display());
            std::fs::read_to_string(secondary)
        })
        .map(|s| s.trim().to_string())
        .map_err(|e| warn!("no machine-id file readable: {e}"))
        .ok()
}

fn installation_id(
    provider: &(dyn Fn() -> Result<Option<String>, Box<dyn Error + Send + Sync>> + Send + Sync),
) -> String {
    match provider() {
        Ok(Some(id)) => id,
        Ok(None) => INSTALLATION_UNKNOWN.to_string(),
        Err(e) => {
            warn!("installation id provider failed: {e}");
            INSTALLATION_ERROR.to_string()
        }
    }
}

/// Gets the machine host name.
pub(crate) fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
