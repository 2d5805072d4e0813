//! Volume request configuration assembled from the command line

use std::fmt;
use std::path::PathBuf;

/// Maximum device node name length
pub const MAX_NODE_LEN: usize = 255;

/// UBI volume type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeType {
    /// Dynamic volume (the default)
    #[default]
    Dynamic,
    /// Static volume
    Static,
}

impl VolumeType {
    /// Parse the `--type` value; only the exact lowercase names are accepted
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dynamic" => Some(VolumeType::Dynamic),
            "static" => Some(VolumeType::Static),
            _ => None,
        }
    }

    /// Name as shown in reports and sysfs
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Dynamic => "dynamic",
            VolumeType::Static => "static",
        }
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the target UBI device was named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    /// Device node path, e.g. `/dev/ubi0`
    ByPath(PathBuf),
    /// Deprecated `--devn` device number
    ByLegacyIndex(u32),
}

impl DeviceTarget {
    /// Canonical device node for this target
    pub fn node(&self) -> PathBuf {
        match self {
            DeviceTarget::ByPath(path) => path.clone(),
            DeviceTarget::ByLegacyIndex(devn) => PathBuf::from(format!("/dev/ubi{}", devn)),
        }
    }

    /// Device number, known only when addressed the legacy way
    pub fn legacy_index(&self) -> Option<u32> {
        match self {
            DeviceTarget::ByPath(_) => None,
            DeviceTarget::ByLegacyIndex(devn) => Some(*devn),
        }
    }
}

/// Everything needed to issue one volume creation request.
///
/// Built with defaults, filled in by the argument resolver, then validated
/// and turned into a [`CreateRequest`](crate::ubi::CreateRequest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRequestConfig {
    /// Target UBI device
    pub target: DeviceTarget,
    /// Requested volume ID, `None` to let UBI pick one
    pub volume_id: Option<u32>,
    /// Volume type
    pub volume_type: VolumeType,
    /// Requested size in bytes
    pub size_bytes: u64,
    /// Use all available space, resolved right before issuance
    pub use_max_available: bool,
    /// Volume alignment, always positive
    pub alignment: u32,
    /// Volume name
    pub name: Option<String>,
}

impl VolumeRequestConfig {
    /// Default configuration for the given target
    pub fn new(target: DeviceTarget) -> Self {
        Self {
            target,
            volume_id: None,
            volume_type: VolumeType::Dynamic,
            size_bytes: 0,
            use_max_available: false,
            alignment: 1,
            name: None,
        }
    }

    /// Device node the request is sent to
    pub fn node(&self) -> PathBuf {
        self.target.node()
    }

    /// Volume name, treating an empty string as absent
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}
