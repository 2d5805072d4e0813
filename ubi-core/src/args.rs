//! Command-line option table and argument resolution

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ErrorKind};
use clap::Parser;
use log::LevelFilter;

use crate::config::{DeviceTarget, VolumeRequestConfig, VolumeType, MAX_NODE_LEN};
use crate::error::{MkvolError, Result};
use crate::units;

/// ubimkvol - a tool to create UBI volumes
#[derive(Parser, Debug)]
#[command(
    name = "ubimkvol",
    about = "A tool to create UBI volumes",
    version = env!("CARGO_PKG_VERSION"),
    args_override_self = true,
    after_help = "Example: ubimkvol /dev/ubi0 -s 20MiB -N config_data"
)]
pub struct MkvolArgs {
    /// UBI device node, must be the first argument
    #[arg(value_name = "UBI_DEVICE")]
    pub device: Option<PathBuf>,

    /// Volume alignment (default is 1)
    #[arg(short = 'a', long = "alignment", value_name = "ALIGNMENT", allow_hyphen_values = true)]
    pub alignment: Option<String>,

    /// UBI device number (deprecated, do not use)
    #[arg(short = 'd', long = "devn", value_name = "DEVN", allow_hyphen_values = true)]
    pub devn: Option<String>,

    /// UBI volume ID, assigned automatically if not specified
    #[arg(short = 'n', long = "vol_id", value_name = "VOLUME_ID", allow_hyphen_values = true)]
    pub vol_id: Option<String>,

    /// Volume name
    #[arg(short = 'N', long = "name", value_name = "NAME", allow_hyphen_values = true)]
    pub name: Option<String>,

    /// Volume size in bytes, kilobytes (KiB), megabytes (MiB) or gigabytes (GiB)
    #[arg(short = 's', long = "size", value_name = "BYTES", allow_hyphen_values = true)]
    pub size: Option<String>,

    /// Volume type (dynamic, static), default is dynamic
    #[arg(short = 't', long = "type", value_name = "static|dynamic", allow_hyphen_values = true)]
    pub vol_type: Option<String>,

    /// Set volume size to maximum available size
    #[arg(short = 'm', long = "maxavsize")]
    pub maxavsize: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Mount point of sysfs used to query UBI
    #[arg(long, value_name = "DIR", env = "UBIMKVOL_SYSFS_ROOT", default_value = "/sys")]
    pub sysfs_root: PathBuf,
}

/// Outcome of argument resolution
#[derive(Debug)]
pub enum Resolution {
    /// `--help` was requested; holds the rendered usage text
    Help(String),
    /// `--version` was requested; holds the version line
    Version(String),
    /// Arguments resolved into a volume request
    Resolved(Invocation),
}

/// A resolved invocation: the volume request plus process-level settings
#[derive(Debug)]
pub struct Invocation {
    /// Volume request, not yet validated against the device
    pub config: VolumeRequestConfig,
    /// Log level selected by `--verbose` / `--debug`
    pub log_level: LevelFilter,
    /// sysfs mount point for the UBI backend
    pub sysfs_root: PathBuf,
    /// Warnings produced while resolving, to be logged once logging is up
    pub warnings: Vec<String>,
}

/// Resolve the full argument vector (program name first) into a request.
///
/// Help and version requests come back as [`Resolution::Help`] and
/// [`Resolution::Version`] instead of terminating the process.
pub fn resolve<I, T>(tokens: I) -> Result<Resolution>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let tokens: Vec<OsString> = tokens.into_iter().map(Into::into).collect();

    match MkvolArgs::try_parse_from(tokens.iter().cloned()) {
        Ok(args) => args.into_invocation(tokens.get(1)).map(Resolution::Resolved),
        Err(err) => from_clap_error(err),
    }
}

fn from_clap_error(err: clap::Error) -> Result<Resolution> {
    let context = |kind| {
        err.get(kind)
            .map(|value| value.to_string())
            .unwrap_or_default()
    };

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Ok(Resolution::Help(err.render().to_string()))
        }
        ErrorKind::DisplayVersion => Ok(Resolution::Version(err.render().to_string())),
        ErrorKind::UnknownArgument => Err(MkvolError::UnknownArgument(context(
            ContextKind::InvalidArg,
        ))),
        ErrorKind::InvalidValue | ErrorKind::NoEquals | ErrorKind::MissingRequiredArgument => {
            Err(MkvolError::MissingArgument(context(ContextKind::InvalidArg)))
        }
        _ => Err(MkvolError::InvalidArgument(err.to_string().trim().to_string())),
    }
}

impl MkvolArgs {
    fn into_invocation(self, first_token: Option<&OsString>) -> Result<Invocation> {
        let mut warnings = Vec::new();

        if let Some(device) = &self.device {
            let len = device.as_os_str().len();
            if len > MAX_NODE_LEN {
                return Err(MkvolError::InvalidArgument(format!(
                    "too long device node name: {:?} ({} characters), max. is {}",
                    device, len, MAX_NODE_LEN
                )));
            }
            if first_token.map(|token| token.as_os_str()) != Some(device.as_os_str()) {
                return Err(MkvolError::InvalidArgument(format!(
                    "UBI device node {:?} must be the first argument",
                    device
                )));
            }
        }

        let volume_type = match self.vol_type.as_deref() {
            Some(name) => VolumeType::from_name(name)
                .ok_or_else(|| MkvolError::InvalidVolumeType(name.to_string()))?,
            None => VolumeType::Dynamic,
        };

        let size_bytes = match self.size.as_deref() {
            Some(value) => parse_size(value)?,
            None => 0,
        };

        let alignment = match self.alignment.as_deref() {
            Some(value) => parse_alignment(value)?,
            None => 1,
        };

        let devn = match self.devn.as_deref() {
            Some(value) => {
                let devn = parse_number(value, "UBI device number")?;
                warnings.push(format!(
                    "-d and --devn options are deprecated and will be removed soon, \
                     pass UBI device node name instead\n\
                     Example: ubimkvol /dev/ubi{0}, instead of ubimkvol -d {0}",
                    devn
                ));
                Some(devn)
            }
            None => None,
        };

        let volume_id = match self.vol_id.as_deref() {
            Some(value) => Some(parse_number(value, "volume ID")?),
            None => None,
        };

        let target = match (self.device, devn) {
            (Some(path), Some(devn)) => {
                warnings.push(format!(
                    "both {:?} and UBI device number {} given, using {:?}",
                    path, devn, path
                ));
                DeviceTarget::ByPath(path)
            }
            (Some(path), None) => DeviceTarget::ByPath(path),
            (None, Some(devn)) => DeviceTarget::ByLegacyIndex(devn),
            (None, None) => {
                return Err(MkvolError::MissingArgument(
                    "UBI device name was not specified".to_string(),
                ))
            }
        };

        let log_level = if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        };

        Ok(Invocation {
            config: VolumeRequestConfig {
                target,
                volume_id,
                volume_type,
                size_bytes,
                use_max_available: self.maxavsize,
                alignment,
                name: self.name,
            },
            log_level,
            sysfs_root: self.sysfs_root,
            warnings,
        })
    }
}

/// Parse a `--size` value: an integer optionally followed by `KiB`, `MiB`
/// or `GiB`.
pub fn parse_size(value: &str) -> Result<u64> {
    let bad = || MkvolError::InvalidSize(format!("bad volume size: \"{}\"", value));

    let (number, suffix) = units::parse_uint_prefix(value).ok_or_else(bad)?;
    let mult = units::multiplier(suffix).map_err(|e| MkvolError::InvalidSize(e.to_string()))?;

    number
        .checked_mul(mult)
        .filter(|bytes| *bytes <= i64::MAX as u64)
        .ok_or_else(bad)
}

/// Parse a `--alignment` value, which must be a positive integer
pub fn parse_alignment(value: &str) -> Result<u32> {
    parse_number(value, "volume alignment").and_then(|alignment| {
        if alignment == 0 {
            Err(MkvolError::InvalidArgument(format!(
                "bad volume alignment: \"{}\"",
                value
            )))
        } else {
            Ok(alignment)
        }
    })
}

// Ids and alignment travel to the kernel as signed 32-bit integers.
fn parse_number(value: &str, what: &str) -> Result<u32> {
    units::parse_uint(value)
        .filter(|n| *n <= i32::MAX as u64)
        .map(|n| n as u32)
        .ok_or_else(|| MkvolError::InvalidArgument(format!("bad {}: \"{}\"", what, value)))
}
