//! Error types for the volume creation pipeline and the device manager

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the volume creation pipeline.
///
/// Every variant is terminal for the invocation.
#[derive(Error, Debug)]
pub enum MkvolError {
    /// Malformed numeric option, over-long device node or misplaced positional
    #[error("{0}")]
    InvalidArgument(String),

    /// Malformed `--size` value
    #[error("{0}")]
    InvalidSize(String),

    /// `--type` was neither `static` nor `dynamic`
    #[error("bad volume type: \"{0}\"")]
    InvalidVolumeType(String),

    /// An option that takes a value was given none, or no device was named
    #[error("parameter is missing: {0} (use -h for help)")]
    MissingArgument(String),

    /// Unrecognized option or stray positional argument
    #[error("unknown argument: {0} (use -h for help)")]
    UnknownArgument(String),

    /// Neither `--size` nor `--maxavsize` was given
    #[error("volume size was not specified (use -h for help)")]
    MissingSize,

    /// `--name` was omitted or empty
    #[error("volume name was not specified (use -h for help)")]
    MissingName,

    /// Volume name exceeds the limit reported by the device manager
    #[error("too long name ({len} symbols), max is {max}")]
    NameTooLong {
        /// Length of the supplied name in bytes
        len: usize,
        /// Maximum accepted by the device manager
        max: usize,
    },

    /// Legacy device index is beyond the number of UBI devices
    #[error("UBI device {0} does not exist")]
    DeviceNotFound(u32),

    /// Opening the manager or querying manager/device information failed
    #[error("cannot get {what}")]
    DeviceQueryFailed {
        /// What was being queried
        what: String,
        /// Underlying device manager error
        #[source]
        source: DeviceError,
    },

    /// The create call was rejected by the device manager
    #[error("cannot create UBI volume")]
    CreateFailed(#[source] DeviceError),

    /// The volume was created but could not be read back
    #[error("cannot get information about newly created UBI volume")]
    PostCreateQueryFailed(#[source] DeviceError),
}

impl MkvolError {
    pub(crate) fn query(what: impl Into<String>, source: DeviceError) -> Self {
        MkvolError::DeviceQueryFailed {
            what: what.into(),
            source,
        }
    }
}

/// Error type for device manager operations
#[derive(Error, Debug)]
pub enum DeviceError {
    /// I/O error, including errors returned by the kernel
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// No UBI class directory in sysfs
    #[error("UBI is not present in the system ({0:?} not found)")]
    NotPresent(PathBuf),
    /// sysfs interface version other than 1
    #[error("unsupported UBI sysfs interface version: {0}")]
    UnsupportedVersion(u32),
    /// Device node is not a character device
    #[error("{0:?} is not a character device")]
    NotCharDevice(PathBuf),
    /// Character device does not belong to any UBI device
    #[error("{0:?} is not a UBI device node")]
    NoSuchDevice(PathBuf),
    /// No UBI device with this number
    #[error("UBI device {0} does not exist")]
    NoSuchDeviceNumber(u32),
    /// No such volume on the device
    #[error("volume {vol_id} does not exist on UBI device {dev_num}")]
    NoSuchVolume {
        /// UBI device number
        dev_num: u32,
        /// Volume ID
        vol_id: u32,
    },
    /// sysfs attribute with unexpected contents
    #[error("bad value {value:?} in {path:?}")]
    BadAttribute {
        /// Attribute file
        path: PathBuf,
        /// Contents read
        value: String,
    },
    /// Not available on this platform
    #[error("operation not supported on this platform")]
    Unsupported,
}

/// Result type for the volume creation pipeline
pub type Result<T> = std::result::Result<T, MkvolError>;
