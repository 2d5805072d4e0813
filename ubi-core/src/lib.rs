//! ubimkvol core - create UBI volumes from command-line intent
//!
//! This crate turns the `ubimkvol` command line into one validated volume
//! creation request, issues it through a [`VolumeManager`] and reports the
//! created volume. The pipeline runs in order:
//!
//! 1. [`args::resolve`] - command line to [`VolumeRequestConfig`]
//! 2. [`validate::validate`] - sanity checks against the UBI subsystem
//! 3. [`mkvol::build_request`] - final size and immutable [`CreateRequest`]
//! 4. [`Report`] - the summary line of the created volume
//!
//! [`Pipeline`] drives steps 2 to 4 against an open manager handle.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rust_2018_idioms)]

pub mod args;
pub mod config;
pub mod error;
pub mod mkvol;
pub mod report;
pub mod ubi;
pub mod units;
pub mod validate;

// Re-export the commonly used types
pub use args::{resolve, Invocation, Resolution};
pub use config::{DeviceTarget, VolumeRequestConfig, VolumeType};
pub use error::{DeviceError, MkvolError, Result};
pub use mkvol::{Outcome, Pipeline, Stage};
pub use report::Report;
pub use ubi::{CreateRequest, SysfsUbi, VolumeManager};

/// Re-export common types and traits
pub mod prelude {
    pub use crate::error::Result;
    pub use crate::ubi::VolumeManager;
}
