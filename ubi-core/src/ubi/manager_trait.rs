//! Volume manager trait definitions

use std::path::Path;

use super::CreateRequest;
use crate::config::VolumeType;
use crate::error::DeviceError;

/// Maximum volume name length accepted by UBI
pub const UBI_MAX_VOLUME_NAME: usize = 127;

/// Result type for volume manager operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// General information about the UBI subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerInfo {
    /// Number of UBI devices present
    pub dev_count: u32,
    /// Lowest UBI device number, if any device exists
    pub lowest_dev: Option<u32>,
    /// Highest UBI device number, if any device exists
    pub highest_dev: Option<u32>,
    /// Version of the kernel interface
    pub version: u32,
    /// Maximum volume name length in bytes
    pub max_volume_name_len: usize,
}

/// Information about one UBI device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// UBI device number
    pub dev_num: u32,
    /// Number of existing volumes
    pub vol_count: u32,
    /// Maximum number of volumes
    pub max_vol_count: u32,
    /// Logical eraseblock size in bytes
    pub leb_size: u64,
    /// Total number of logical eraseblocks
    pub total_lebs: u64,
    /// Number of logical eraseblocks not reserved by any volume
    pub avail_lebs: u64,
    /// Total size in bytes
    pub total_bytes: u64,
    /// Bytes not reserved by any volume
    pub avail_bytes: u64,
    /// Minimum input/output unit size
    pub min_io_size: u64,
}

/// Information about one UBI volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// UBI device number the volume lives on
    pub dev_num: u32,
    /// Volume ID
    pub vol_id: u32,
    /// Volume type
    pub vol_type: VolumeType,
    /// Volume alignment
    pub alignment: u32,
    /// Bytes of data stored in the volume
    pub data_bytes: u64,
    /// Number of reserved logical eraseblocks
    pub rsvd_lebs: u64,
    /// Usable logical eraseblock size
    pub leb_size: u64,
    /// Reserved bytes (`rsvd_lebs * leb_size`)
    pub rsvd_bytes: u64,
    /// Volume name
    pub name: String,
}

/// Trait for UBI device manager operations.
///
/// A value implementing this trait is an open handle; dropping it closes
/// the handle.
pub trait VolumeManager {
    /// Get general UBI information
    fn manager_info(&self) -> Result<ManagerInfo>;

    /// Get information about the UBI device behind `node`
    fn device_info(&self, node: &Path) -> Result<DeviceInfo>;

    /// Create a volume on the device behind `node` and return its ID
    fn create_volume(&mut self, node: &Path, request: CreateRequest) -> Result<u32>;

    /// Get information about a volume
    fn volume_info(&self, dev_num: u32, vol_id: u32) -> Result<VolumeInfo>;
}
