//! ubimkvol Command Line Interface
//!
//! Creates one UBI volume and prints a summary of it.

use anyhow::Result;
use log::{info, warn};

use ubimkvol::mkvol::run_with;
use ubimkvol::{Resolution, SysfsUbi};

fn main() -> Result<()> {
    let invocation = match ubimkvol::resolve(std::env::args_os())? {
        Resolution::Help(text) | Resolution::Version(text) => {
            print!("{}", text);
            return Ok(());
        }
        Resolution::Resolved(invocation) => invocation,
    };

    env_logger::Builder::new()
        .filter_level(invocation.log_level)
        .init();

    info!("ubimkvol v{} starting...", env!("CARGO_PKG_VERSION"));

    for warning in &invocation.warnings {
        warn!("{}", warning);
    }

    let sysfs_root = invocation.sysfs_root;
    let outcome = run_with(
        || SysfsUbi::open(&sysfs_root),
        invocation.config,
        |size| println!("Set volume size to {}", size),
    )?;

    println!("{}", outcome.report);

    Ok(())
}
