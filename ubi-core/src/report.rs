//! Human-readable summary of a newly created volume

use std::fmt;

use crate::ubi::VolumeInfo;
use crate::units::{GIB, KIB, MIB};

/// Summary line printed after a volume was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    volume: VolumeInfo,
}

impl Report {
    /// Build a report from freshly queried volume information
    pub fn new(volume: VolumeInfo) -> Self {
        Self { volume }
    }

    /// Volume the report describes
    pub fn volume(&self) -> &VolumeInfo {
        &self.volume
    }

    /// Volume size in logical eraseblocks
    pub fn leb_count(&self) -> u64 {
        self.volume
            .rsvd_bytes
            .checked_div(self.volume.leb_size)
            .unwrap_or(0)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vol = &self.volume;
        write!(
            f,
            "Volume ID is {}, size {} LEBs ({} bytes, {}), LEB size is {} bytes ({:.1} KiB), {} volume, name \"{}\"",
            vol.vol_id,
            self.leb_count(),
            vol.rsvd_bytes,
            format_size(vol.rsvd_bytes),
            vol.leb_size,
            vol.leb_size as f64 / KIB as f64,
            vol.vol_type,
            vol.name
        )
    }
}

/// Render `bytes` in the largest of GiB, MiB and KiB that keeps the value
/// at least 1, with one decimal place
pub fn format_size(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VolumeType;

    fn volume(rsvd_lebs: u64, leb_size: u64) -> VolumeInfo {
        VolumeInfo {
            dev_num: 0,
            vol_id: 3,
            vol_type: VolumeType::Dynamic,
            alignment: 1,
            data_bytes: 0,
            rsvd_lebs,
            leb_size,
            rsvd_bytes: rsvd_lebs * leb_size,
            name: "data".to_string(),
        }
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(GIB), "1.0 GiB");
        assert_eq!(format_size(3 * GIB / 2), "1.5 GiB");
        assert_eq!(format_size(GIB - 1), "1024.0 MiB");
        assert_eq!(format_size(MIB), "1.0 MiB");
        assert_eq!(format_size(10 * MIB), "10.0 MiB");
        assert_eq!(format_size(MIB - KIB), "1023.0 KiB");
        assert_eq!(format_size(512), "0.5 KiB");
        assert_eq!(format_size(0), "0.0 KiB");
    }

    #[test]
    fn test_report_line() {
        let report = Report::new(volume(83, 126976));
        assert_eq!(
            report.to_string(),
            "Volume ID is 3, size 83 LEBs (10539008 bytes, 10.1 MiB), \
             LEB size is 126976 bytes (124.0 KiB), dynamic volume, name \"data\""
        );
    }

    #[test]
    fn test_zero_leb_size() {
        let mut vol = volume(0, 0);
        vol.rsvd_bytes = 4096;
        assert_eq!(Report::new(vol).leb_count(), 0);
    }
}
