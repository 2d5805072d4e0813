//! UBI device manager access
//!
//! The volume creation pipeline only talks to [`VolumeManager`]; the
//! [`SysfsUbi`] backend implements it on Linux the way `libubi` does, by
//! reading `/sys/class/ubi` and issuing `UBI_IOCMKVOL` on the device node.

mod manager_trait;
mod request;
mod sysfs;

// Re-export the volume manager trait and related types
pub use self::manager_trait::{
    DeviceInfo, ManagerInfo, Result, VolumeInfo, VolumeManager, UBI_MAX_VOLUME_NAME,
};
pub use self::request::{read_assigned_id, CreateRequest, UBI_IOCMKVOL, UBI_VOL_NUM_AUTO};
pub use self::sysfs::SysfsUbi;
