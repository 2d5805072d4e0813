//! Volume creation pipeline: validate, resolve the size, create, report

use log::{debug, info};

use crate::config::VolumeRequestConfig;
use crate::error::{DeviceError, MkvolError, Result};
use crate::report::Report;
use crate::ubi::{CreateRequest, DeviceInfo, VolumeManager};
use crate::validate;

/// Pipeline stages, in order. A failure at any stage ends the run with the
/// returned error; the pipeline stays at the last stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Nothing done yet
    Start,
    /// Command line resolved into a configuration
    ArgsParsed,
    /// Configuration passed the sanity checks
    Validated,
    /// Final size known, request built
    SizeResolved,
    /// Volume created
    Created,
    /// Volume information read back
    Reported,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Size taken from the device when `--maxavsize` was given
    pub max_available_size: Option<u64>,
    /// Summary of the created volume
    pub report: Report,
}

/// Drives one volume creation through its stages
#[derive(Debug)]
pub struct Pipeline {
    stage: Stage,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a pipeline at [`Stage::Start`]
    pub fn new() -> Self {
        Self { stage: Stage::Start }
    }

    /// Last stage reached
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!("Pipeline stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Validate `config`, create the volume through `manager` and read it back.
    ///
    /// The request is issued exactly once. If reading the volume back fails
    /// the volume has still been created.
    pub fn run<M: VolumeManager + ?Sized>(
        &mut self,
        manager: &mut M,
        config: VolumeRequestConfig,
    ) -> Result<Outcome> {
        self.run_with_notice(manager, config, |_| {})
    }

    /// Like [`Pipeline::run`], but calls `on_max_size` with the size taken
    /// from the device under `--maxavsize`, before the create request is
    /// issued.
    pub fn run_with_notice<M, N>(
        &mut self,
        manager: &mut M,
        config: VolumeRequestConfig,
        mut on_max_size: N,
    ) -> Result<Outcome>
    where
        M: VolumeManager + ?Sized,
        N: FnMut(u64),
    {
        self.advance(Stage::ArgsParsed);

        validate::validate(&config, &*manager)?;
        self.advance(Stage::Validated);

        let node = config.node();
        let device = manager.device_info(&node).map_err(|e| {
            MkvolError::query(format!("information about UBI device {:?}", node), e)
        })?;
        debug!("UBI device information: {:?}", device);

        let max_available_size = config.use_max_available.then(|| device.avail_bytes);
        let request = build_request(config, &device)?;
        if let Some(size) = max_available_size {
            on_max_size(size);
        }
        self.advance(Stage::SizeResolved);

        info!("Creating volume {:?} on {:?}", request.name(), node);
        let vol_id = manager
            .create_volume(&node, request)
            .map_err(MkvolError::CreateFailed)?;
        info!("Created volume {} on UBI device {}", vol_id, device.dev_num);
        self.advance(Stage::Created);

        let volume = manager
            .volume_info(device.dev_num, vol_id)
            .map_err(MkvolError::PostCreateQueryFailed)?;
        self.advance(Stage::Reported);

        Ok(Outcome {
            max_available_size,
            report: Report::new(volume),
        })
    }
}

/// Open a manager handle with `open`, run a [`Pipeline`] on it and close it
/// again, whatever the outcome. `on_max_size` is passed to
/// [`Pipeline::run_with_notice`].
pub fn run_with<M, F, N>(open: F, config: VolumeRequestConfig, on_max_size: N) -> Result<Outcome>
where
    M: VolumeManager,
    F: FnOnce() -> std::result::Result<M, DeviceError>,
    N: FnMut(u64),
{
    let mut manager = open().map_err(|e| MkvolError::query("access to UBI", e))?;
    Pipeline::new().run_with_notice(&mut manager, config, on_max_size)
}

/// Turn a validated configuration into the request sent to the device.
///
/// With `use_max_available` the size is taken from `device` regardless of
/// any explicit size.
pub fn build_request(config: VolumeRequestConfig, device: &DeviceInfo) -> Result<CreateRequest> {
    let size_bytes = if config.use_max_available {
        device.avail_bytes
    } else {
        config.size_bytes
    };

    let name = config.name.filter(|n| !n.is_empty()).ok_or(MkvolError::MissingName)?;

    Ok(CreateRequest::new(
        config.volume_id,
        config.alignment,
        size_bytes,
        config.volume_type,
        name,
    ))
}
