//! Sanity checks run on a resolved request before anything is created

use log::debug;

use crate::config::VolumeRequestConfig;
use crate::error::{MkvolError, Result};
use crate::ubi::{ManagerInfo, VolumeManager};

/// Validate `config` against the device manager.
///
/// Checks run in a fixed order and the first failure is returned:
/// size given, name given, manager reachable, legacy device number in
/// range, name short enough.
pub fn validate<M: VolumeManager + ?Sized>(config: &VolumeRequestConfig, manager: &M) -> Result<()> {
    check_request(config)?;

    let info = manager
        .manager_info()
        .map_err(|e| MkvolError::query("UBI information", e))?;
    debug!("UBI information: {:?}", info);

    check_limits(config, &info)
}

/// Checks that need no device information
pub fn check_request(config: &VolumeRequestConfig) -> Result<()> {
    if config.size_bytes == 0 && !config.use_max_available {
        return Err(MkvolError::MissingSize);
    }

    if config.name().is_none() {
        return Err(MkvolError::MissingName);
    }

    Ok(())
}

/// Checks against limits reported by the device manager
pub fn check_limits(config: &VolumeRequestConfig, info: &ManagerInfo) -> Result<()> {
    if let Some(devn) = config.target.legacy_index() {
        if devn >= info.dev_count {
            return Err(MkvolError::DeviceNotFound(devn));
        }
    }

    let len = config.name().map_or(0, str::len);
    if len > info.max_volume_name_len {
        return Err(MkvolError::NameTooLong {
            len,
            max: info.max_volume_name_len,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceTarget;
    use crate::ubi::UBI_MAX_VOLUME_NAME;

    fn info(dev_count: u32) -> ManagerInfo {
        ManagerInfo {
            dev_count,
            lowest_dev: if dev_count > 0 { Some(0) } else { None },
            highest_dev: dev_count.checked_sub(1),
            version: 1,
            max_volume_name_len: UBI_MAX_VOLUME_NAME,
        }
    }

    fn config(name: Option<&str>, size_bytes: u64) -> VolumeRequestConfig {
        let mut config = VolumeRequestConfig::new(DeviceTarget::ByPath("/dev/ubi0".into()));
        config.name = name.map(str::to_string);
        config.size_bytes = size_bytes;
        config
    }

    #[test]
    fn test_missing_size_takes_precedence() {
        // No name either, but the size check runs first
        assert!(matches!(check_request(&config(None, 0)), Err(MkvolError::MissingSize)));
        assert!(matches!(
            check_request(&config(Some("data"), 0)),
            Err(MkvolError::MissingSize)
        ));
    }

    #[test]
    fn test_max_available_counts_as_size() {
        let mut cfg = config(Some("data"), 0);
        cfg.use_max_available = true;
        assert!(check_request(&cfg).is_ok());
    }

    #[test]
    fn test_missing_or_empty_name() {
        assert!(matches!(check_request(&config(None, 1)), Err(MkvolError::MissingName)));
        assert!(matches!(check_request(&config(Some(""), 1)), Err(MkvolError::MissingName)));
    }

    #[test]
    fn test_name_length_boundary() {
        let at_limit = "a".repeat(UBI_MAX_VOLUME_NAME);
        assert!(check_limits(&config(Some(&at_limit), 1), &info(1)).is_ok());

        let too_long = "a".repeat(UBI_MAX_VOLUME_NAME + 1);
        match check_limits(&config(Some(&too_long), 1), &info(1)) {
            Err(MkvolError::NameTooLong { len, max }) => {
                assert_eq!(len, UBI_MAX_VOLUME_NAME + 1);
                assert_eq!(max, UBI_MAX_VOLUME_NAME);
            }
            other => panic!("expected NameTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_index_range() {
        let mut cfg = config(Some("data"), 1);
        cfg.target = DeviceTarget::ByLegacyIndex(1);
        assert!(check_limits(&cfg, &info(2)).is_ok());
        assert!(matches!(
            check_limits(&cfg, &info(1)),
            Err(MkvolError::DeviceNotFound(1))
        ));
    }

    #[test]
    fn test_missing_device_reported_before_long_name() {
        let mut cfg = config(Some(&"a".repeat(200)), 1);
        cfg.target = DeviceTarget::ByLegacyIndex(4);
        assert!(matches!(
            check_limits(&cfg, &info(0)),
            Err(MkvolError::DeviceNotFound(4))
        ));
    }
}
