use std::fs;
use std::path::Path;

use tempfile::TempDir;
use ubimkvol::ubi::UBI_MAX_VOLUME_NAME;
use ubimkvol::{DeviceError, SysfsUbi, VolumeManager, VolumeType};

fn write_attrs(dir: &Path, attrs: &[(&str, &str)]) {
    fs::create_dir_all(dir).expect("Failed to create sysfs directory");
    for (name, value) in attrs {
        fs::write(dir.join(name), format!("{}\n", value)).expect("Failed to write attribute");
    }
}

/// Build a sysfs tree with two UBI devices and one volume on ubi0
fn fake_sysfs() -> TempDir {
    let root = TempDir::new().expect("Failed to create temp dir");
    let class = root.path().join("class/ubi");

    write_attrs(&class, &[("version", "1")]);
    write_attrs(
        &class.join("ubi0"),
        &[
            ("dev", "250:0"),
            ("eraseblock_size", "126976"),
            ("total_eraseblocks", "1000"),
            ("avail_eraseblocks", "917"),
            ("volumes_count", "1"),
            ("max_vol_count", "128"),
            ("min_io_size", "2048"),
        ],
    );
    write_attrs(
        &class.join("ubi1"),
        &[
            ("dev", "251:0"),
            ("eraseblock_size", "253952"),
            ("total_eraseblocks", "400"),
            ("avail_eraseblocks", "0"),
            ("volumes_count", "0"),
            ("max_vol_count", "128"),
            ("min_io_size", "4096"),
        ],
    );
    write_attrs(
        &class.join("ubi0_3"),
        &[
            ("type", "static"),
            ("alignment", "1"),
            ("data_bytes", "0"),
            ("reserved_ebs", "83"),
            ("usable_eb_size", "126976"),
            ("name", "my data"),
        ],
    );

    root
}

#[test]
fn test_open_requires_ubi_class() {
    let root = TempDir::new().expect("Failed to create temp dir");
    match SysfsUbi::open(root.path()) {
        Err(DeviceError::NotPresent(path)) => assert!(path.ends_with("class/ubi")),
        other => panic!("expected NotPresent, got {:?}", other),
    }
}

#[test]
fn test_open_rejects_unknown_version() {
    let root = fake_sysfs();
    fs::write(root.path().join("class/ubi/version"), "2\n").unwrap();
    assert!(matches!(
        SysfsUbi::open(root.path()),
        Err(DeviceError::UnsupportedVersion(2))
    ));
}

#[test]
fn test_manager_info_counts_devices_only() {
    let root = fake_sysfs();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    let info = ubi.manager_info().unwrap();
    assert_eq!(info.dev_count, 2);
    assert_eq!(info.lowest_dev, Some(0));
    assert_eq!(info.highest_dev, Some(1));
    assert_eq!(info.version, 1);
    assert_eq!(info.max_volume_name_len, UBI_MAX_VOLUME_NAME);
}

#[test]
fn test_device_info_by_number() {
    let root = fake_sysfs();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    let dev = ubi.device_info_by_num(0).unwrap();
    assert_eq!(dev.dev_num, 0);
    assert_eq!(dev.leb_size, 126976);
    assert_eq!(dev.avail_lebs, 917);
    assert_eq!(dev.avail_bytes, 917 * 126976);
    assert_eq!(dev.total_bytes, 1000 * 126976);
    assert_eq!(dev.vol_count, 1);

    assert!(matches!(
        ubi.device_info_by_num(7),
        Err(DeviceError::NoSuchDeviceNumber(7))
    ));
}

#[test]
fn test_find_device_by_char_device_number() {
    let root = fake_sysfs();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    assert_eq!(ubi.find_device(251, 0).unwrap(), Some(1));
    assert_eq!(ubi.find_device(250, 0).unwrap(), Some(0));
    assert_eq!(ubi.find_device(252, 0).unwrap(), None);
}

#[cfg(unix)]
#[test]
fn test_device_info_rejects_regular_file() {
    let root = fake_sysfs();
    let ubi = SysfsUbi::open(root.path()).unwrap();
    let not_a_node = root.path().join("ubi0");
    fs::write(&not_a_node, b"").unwrap();

    assert!(matches!(
        ubi.device_info(&not_a_node),
        Err(DeviceError::NotCharDevice(_))
    ));
}

#[test]
fn test_volume_info() {
    let root = fake_sysfs();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    let vol = ubi.volume_info(0, 3).unwrap();
    assert_eq!(vol.vol_id, 3);
    assert_eq!(vol.vol_type, VolumeType::Static);
    assert_eq!(vol.rsvd_lebs, 83);
    assert_eq!(vol.leb_size, 126976);
    assert_eq!(vol.rsvd_bytes, 83 * 126976);
    assert_eq!(vol.name, "my data");

    assert!(matches!(
        ubi.volume_info(0, 4),
        Err(DeviceError::NoSuchVolume { dev_num: 0, vol_id: 4 })
    ));
}

#[test]
fn test_bad_attribute_value() {
    let root = fake_sysfs();
    fs::write(root.path().join("class/ubi/ubi0_3/type"), "archive\n").unwrap();
    fs::write(root.path().join("class/ubi/ubi1/avail_eraseblocks"), "lots\n").unwrap();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    assert!(matches!(
        ubi.volume_info(0, 3),
        Err(DeviceError::BadAttribute { .. })
    ));
    assert!(matches!(
        ubi.device_info_by_num(1),
        Err(DeviceError::BadAttribute { .. })
    ));
}

#[test]
fn test_oversized_version_is_rejected() {
    let root = fake_sysfs();
    fs::write(root.path().join("class/ubi/version"), "4294967297\n").unwrap();

    match SysfsUbi::open(root.path()) {
        Err(DeviceError::BadAttribute { path, value }) => {
            assert!(path.ends_with("version"));
            assert_eq!(value, "4294967297");
        }
        other => panic!("expected BadAttribute, got {:?}", other),
    }
}

#[test]
fn test_device_size_overflow_is_rejected() {
    let root = fake_sysfs();
    let dev = root.path().join("class/ubi/ubi0");
    fs::write(dev.join("eraseblock_size"), "18446744073709551615\n").unwrap();
    fs::write(dev.join("total_eraseblocks"), "2\n").unwrap();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    assert!(matches!(
        ubi.device_info_by_num(0),
        Err(DeviceError::BadAttribute { .. })
    ));
}

#[test]
fn test_oversized_counts_are_rejected() {
    let root = fake_sysfs();
    fs::write(root.path().join("class/ubi/ubi1/volumes_count"), "4294967296\n").unwrap();
    fs::write(root.path().join("class/ubi/ubi0_3/alignment"), "4294967297\n").unwrap();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    assert!(matches!(
        ubi.device_info_by_num(1),
        Err(DeviceError::BadAttribute { .. })
    ));
    assert!(matches!(
        ubi.volume_info(0, 3),
        Err(DeviceError::BadAttribute { .. })
    ));
}

#[test]
fn test_volume_size_overflow_is_rejected() {
    let root = fake_sysfs();
    let vol = root.path().join("class/ubi/ubi0_3");
    fs::write(vol.join("reserved_ebs"), "18446744073709551615\n").unwrap();
    let ubi = SysfsUbi::open(root.path()).unwrap();

    match ubi.volume_info(0, 3) {
        Err(DeviceError::BadAttribute { path, .. }) => assert!(path.ends_with("reserved_ebs")),
        other => panic!("expected BadAttribute, got {:?}", other),
    }
}
