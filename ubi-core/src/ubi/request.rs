//! Volume creation request and its `UBI_IOCMKVOL` encoding

use std::io::{self, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use super::UBI_MAX_VOLUME_NAME;
use crate::config::VolumeType;

/// `_IOW('o', 0, struct ubi_mkvol_req)`
pub const UBI_IOCMKVOL: u32 = 0x4098_6F00;
/// Volume ID asking UBI to pick one
pub const UBI_VOL_NUM_AUTO: i32 = -1;

const UBI_DYNAMIC_VOLUME: i8 = 3;
const UBI_STATIC_VOLUME: i8 = 4;

/// Immutable request to create one volume.
///
/// Built from a validated configuration and consumed by
/// [`VolumeManager::create_volume`](super::VolumeManager::create_volume).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    volume_id: Option<u32>,
    alignment: u32,
    size_bytes: u64,
    volume_type: VolumeType,
    name: String,
}

impl CreateRequest {
    /// Size of the packed `struct ubi_mkvol_req` in bytes
    pub const SIZE: usize = 4 + 4 + 8 + 1 + 1 + 2 + 4 + UBI_MAX_VOLUME_NAME + 1; // 152 bytes

    /// Create a new request
    pub fn new(
        volume_id: Option<u32>,
        alignment: u32,
        size_bytes: u64,
        volume_type: VolumeType,
        name: impl Into<String>,
    ) -> Self {
        Self {
            volume_id,
            alignment,
            size_bytes,
            volume_type,
            name: name.into(),
        }
    }

    /// Requested volume ID, `None` for automatic assignment
    pub fn volume_id(&self) -> Option<u32> {
        self.volume_id
    }

    /// Volume alignment
    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    /// Volume size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Volume type
    pub fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    /// Volume name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write the request as a packed `struct ubi_mkvol_req` (exactly 152 bytes)
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let name = self.name.as_bytes();
        if name.len() > UBI_MAX_VOLUME_NAME {
            return Err(invalid_input(format!(
                "volume name is {} bytes, max is {}",
                name.len(),
                UBI_MAX_VOLUME_NAME
            )));
        }

        let vol_id = match self.volume_id {
            Some(id) => i32::try_from(id).map_err(|_| invalid_input("volume ID out of range"))?,
            None => UBI_VOL_NUM_AUTO,
        };
        let alignment =
            i32::try_from(self.alignment).map_err(|_| invalid_input("alignment out of range"))?;
        let bytes =
            i64::try_from(self.size_bytes).map_err(|_| invalid_input("volume size out of range"))?;
        let vol_type = match self.volume_type {
            VolumeType::Dynamic => UBI_DYNAMIC_VOLUME,
            VolumeType::Static => UBI_STATIC_VOLUME,
        };

        writer.write_i32::<NativeEndian>(vol_id)?;
        writer.write_i32::<NativeEndian>(alignment)?;
        writer.write_i64::<NativeEndian>(bytes)?;
        writer.write_i8(vol_type)?;
        writer.write_u8(0)?; // padding1
        writer.write_i16::<NativeEndian>(name.len() as i16)?;
        writer.write_all(&[0u8; 4])?; // padding2

        // Name is NUL-padded to UBI_MAX_VOLUME_NAME + 1 bytes
        let mut name_buf = [0u8; UBI_MAX_VOLUME_NAME + 1];
        name_buf[..name.len()].copy_from_slice(name);
        writer.write_all(&name_buf)?;

        Ok(())
    }

    /// Encode the request into a buffer suitable for the ioctl
    pub fn to_bytes(&self) -> io::Result<[u8; Self::SIZE]> {
        let mut buf = [0u8; Self::SIZE];
        self.write_to(&mut &mut buf[..])?;
        Ok(buf)
    }
}

/// Read the volume ID the kernel wrote back into an encoded request
pub fn read_assigned_id(buf: &[u8]) -> io::Result<u32> {
    let vol_id = (&buf[..]).read_i32::<NativeEndian>()?;
    u32::try_from(vol_id).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("kernel returned invalid volume ID {}", vol_id),
        )
    })
}

fn invalid_input(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}
