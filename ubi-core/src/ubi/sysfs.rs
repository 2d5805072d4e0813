//! sysfs and ioctl backed UBI access

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use super::manager_trait::{
    DeviceInfo, ManagerInfo, Result, VolumeInfo, VolumeManager, UBI_MAX_VOLUME_NAME,
};
use super::request::{read_assigned_id, CreateRequest, UBI_IOCMKVOL};
use crate::config::VolumeType;
use crate::error::DeviceError;

/// sysfs interface version this backend understands
const UBI_SYSFS_VERSION: u32 = 1;

/// UBI access through `<sysfs>/class/ubi` and the device node ioctls
#[derive(Debug)]
pub struct SysfsUbi {
    class_dir: PathBuf,
    version: u32,
}

impl SysfsUbi {
    /// Open the UBI interface under the given sysfs mount point (usually `/sys`)
    pub fn open(sysfs_root: impl AsRef<Path>) -> Result<Self> {
        let class_dir = sysfs_root.as_ref().join("class").join("ubi");
        if !class_dir.is_dir() {
            return Err(DeviceError::NotPresent(class_dir));
        }

        let version = read_u32(&class_dir.join("version"))?;
        if version != UBI_SYSFS_VERSION {
            return Err(DeviceError::UnsupportedVersion(version));
        }

        debug!("Opened UBI sysfs interface at {:?} (version {})", class_dir, version);
        Ok(Self { class_dir, version })
    }

    /// Sorted numbers of all UBI devices present
    pub fn device_numbers(&self) -> Result<Vec<u32>> {
        let mut numbers = Vec::new();
        for entry in fs::read_dir(&self.class_dir)? {
            let entry = entry?;
            if let Some(num) = entry.file_name().to_str().and_then(parse_device_dir) {
                numbers.push(num);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Find the UBI device whose character device number is `major:minor`
    pub fn find_device(&self, major: u32, minor: u32) -> Result<Option<u32>> {
        let wanted = format!("{}:{}", major, minor);
        for num in self.device_numbers()? {
            if read_attr(&self.device_dir(num).join("dev"))? == wanted {
                return Ok(Some(num));
            }
        }
        Ok(None)
    }

    /// Get information about a UBI device by its number
    pub fn device_info_by_num(&self, dev_num: u32) -> Result<DeviceInfo> {
        let dir = self.device_dir(dev_num);
        if !dir.is_dir() {
            return Err(DeviceError::NoSuchDeviceNumber(dev_num));
        }

        let leb_size = read_u64(&dir.join("eraseblock_size"))?;
        let total_lebs = read_u64(&dir.join("total_eraseblocks"))?;
        let avail_lebs = read_u64(&dir.join("avail_eraseblocks"))?;

        Ok(DeviceInfo {
            dev_num,
            vol_count: read_u32(&dir.join("volumes_count"))?,
            max_vol_count: read_u32(&dir.join("max_vol_count"))?,
            leb_size,
            total_lebs,
            avail_lebs,
            total_bytes: lebs_to_bytes(&dir.join("total_eraseblocks"), total_lebs, leb_size)?,
            avail_bytes: lebs_to_bytes(&dir.join("avail_eraseblocks"), avail_lebs, leb_size)?,
            min_io_size: read_u64(&dir.join("min_io_size"))?,
        })
    }

    fn device_dir(&self, dev_num: u32) -> PathBuf {
        self.class_dir.join(format!("ubi{}", dev_num))
    }

    fn volume_dir(&self, dev_num: u32, vol_id: u32) -> PathBuf {
        self.class_dir.join(format!("ubi{}_{}", dev_num, vol_id))
    }
}

impl VolumeManager for SysfsUbi {
    fn manager_info(&self) -> Result<ManagerInfo> {
        let numbers = self.device_numbers()?;

        Ok(ManagerInfo {
            dev_count: numbers.len() as u32,
            lowest_dev: numbers.first().copied(),
            highest_dev: numbers.last().copied(),
            version: self.version,
            max_volume_name_len: UBI_MAX_VOLUME_NAME,
        })
    }

    fn device_info(&self, node: &Path) -> Result<DeviceInfo> {
        let (major, minor) = char_device_number(node)?;
        debug!("Looking up UBI device {}:{} for {:?}", major, minor, node);

        match self.find_device(major, minor)? {
            Some(dev_num) => self.device_info_by_num(dev_num),
            None => Err(DeviceError::NoSuchDevice(node.to_path_buf())),
        }
    }

    fn create_volume(&mut self, node: &Path, request: CreateRequest) -> Result<u32> {
        let mut buf = request.to_bytes()?;
        let file = File::open(node)?;

        debug!("Issuing UBI_IOCMKVOL on {:?}: {:?}", node, request);
        mkvol_ioctl(&file, &mut buf)?;

        Ok(read_assigned_id(&buf)?)
    }

    fn volume_info(&self, dev_num: u32, vol_id: u32) -> Result<VolumeInfo> {
        let dir = self.volume_dir(dev_num, vol_id);
        if !dir.is_dir() {
            return Err(DeviceError::NoSuchVolume { dev_num, vol_id });
        }

        let type_path = dir.join("type");
        let type_name = read_attr(&type_path)?;
        let vol_type = VolumeType::from_name(&type_name).ok_or(DeviceError::BadAttribute {
            path: type_path,
            value: type_name,
        })?;

        let rsvd_lebs = read_u64(&dir.join("reserved_ebs"))?;
        let leb_size = read_u64(&dir.join("usable_eb_size"))?;

        // Names may contain spaces, only the sysfs newline is stripped
        let name = fs::read_to_string(dir.join("name"))?;
        let name = name.strip_suffix('\n').unwrap_or(&name).to_string();

        Ok(VolumeInfo {
            dev_num,
            vol_id,
            vol_type,
            alignment: read_u32(&dir.join("alignment"))?,
            data_bytes: read_u64(&dir.join("data_bytes"))?,
            rsvd_lebs,
            leb_size,
            rsvd_bytes: lebs_to_bytes(&dir.join("reserved_ebs"), rsvd_lebs, leb_size)?,
            name,
        })
    }
}

impl Drop for SysfsUbi {
    fn drop(&mut self) {
        debug!("Closing UBI sysfs interface at {:?}", self.class_dir);
    }
}

/// `ubiN` directory name to device number; volume directories (`ubiN_M`)
/// and other entries yield `None`
fn parse_device_dir(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("ubi")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn read_attr(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

fn read_u64(path: &Path) -> Result<u64> {
    let value = read_attr(path)?;
    value.parse().map_err(|_| DeviceError::BadAttribute {
        path: path.to_path_buf(),
        value,
    })
}

fn read_u32(path: &Path) -> Result<u32> {
    let value = read_u64(path)?;
    u32::try_from(value).map_err(|_| DeviceError::BadAttribute {
        path: path.to_path_buf(),
        value: value.to_string(),
    })
}

// `path` is the eraseblock count attribute blamed when the product overflows
fn lebs_to_bytes(path: &Path, lebs: u64, leb_size: u64) -> Result<u64> {
    lebs.checked_mul(leb_size).ok_or_else(|| DeviceError::BadAttribute {
        path: path.to_path_buf(),
        value: lebs.to_string(),
    })
}

/// Major and minor number of a character device node
#[cfg(unix)]
fn char_device_number(node: &Path) -> Result<(u32, u32)> {
    use std::os::unix::fs::{FileTypeExt, MetadataExt};

    let metadata = fs::metadata(node)?;
    if !metadata.file_type().is_char_device() {
        return Err(DeviceError::NotCharDevice(node.to_path_buf()));
    }

    // glibc encoding of dev_t
    let rdev = metadata.rdev();
    let major = ((rdev >> 8) & 0xfff) | ((rdev >> 32) & !0xfff);
    let minor = (rdev & 0xff) | ((rdev >> 12) & !0xff);
    Ok((major as u32, minor as u32))
}

#[cfg(not(unix))]
fn char_device_number(_node: &Path) -> Result<(u32, u32)> {
    Err(DeviceError::Unsupported)
}

#[cfg(unix)]
fn mkvol_ioctl(file: &File, buf: &mut [u8; CreateRequest::SIZE]) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let result = unsafe { libc::ioctl(file.as_raw_fd(), UBI_IOCMKVOL as _, buf.as_mut_ptr()) };
    if result == -1 {
        return Err(DeviceError::Io(io::Error::last_os_error()));
    }

    Ok(())
}

#[cfg(not(unix))]
fn mkvol_ioctl(_file: &File, _buf: &mut [u8; CreateRequest::SIZE]) -> Result<()> {
    Err(DeviceError::Unsupported)
}
