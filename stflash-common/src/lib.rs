// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and logic for stflash.
//!
//! Flashing is a short pipeline:
//! - an [`Action`] is selected (`program` or `erase`),
//! - the three bundled assets are resolved into [`AssetPaths`] through an [`AssetResolver`],
//! - a [`CommandSequence`] for OpenOCD is built from both,
//! - an [`Executor`] runs it with the fixed [`EnvOverrides`].
//!
//! Features:
//! - `cli`: derives `clap::ValueEnum` for [`Action`] so host tools can use it as a positional.

pub mod action;
pub mod assets;
pub mod error;
pub mod executor;
pub mod sequence;

pub use action::Action;
pub use assets::{AssetIds, AssetKind, AssetPaths, AssetResolver};
pub use error::FlashError;
pub use executor::{EnvOverrides, Executor, ProcessExecutor};
pub use sequence::CommandSequence;

/// Default runfiles identifier of the OpenOCD executable.
pub const DEFAULT_DEBUGGER_ID: &str = "openocd/bin/openocd";
/// Default runfiles identifier of the firmware image.
pub const DEFAULT_FIRMWARE_ID: &str = "_main/apps/blinky/application.elf";
/// Default runfiles identifier of the OpenOCD target configuration.
pub const DEFAULT_DEBUGGER_CONFIG_ID: &str = "_main/apps/blinky/openocd_stm32l4xx.cfg";

/// Variable read by the OpenOCD board config to decide whether to open a GDB port.
pub const GDB_PORT_VAR: &str = "PW_GDB_PORT";
pub const GDB_PORT_DISABLED: &str = "disabled";

/// Resolve the assets, build the command sequence for `action` and run it.
///
/// Fails before anything is spawned if any asset is missing. The executor is
/// called exactly once otherwise.
pub fn flash<R, E>(
    action: Action,
    ids: &AssetIds,
    resolver: &R,
    executor: &mut E,
) -> Result<(), FlashError>
where
    R: AssetResolver + ?Sized,
    E: Executor + ?Sized,
{
    let paths = AssetPaths::resolve(ids, resolver)?;

    tracing::info!("binary location is: {}", paths.firmware.display());
    tracing::info!("openocd location is: {}", paths.debugger.display());
    tracing::info!(
        "openocd config location is: {}",
        paths.debugger_config.display()
    );

    let sequence = CommandSequence::build(action, &paths);
    let env = EnvOverrides::default();

    tracing::debug!(%action, command = %sequence, "running debugger");

    match executor.execute(&sequence, &env)? {
        Some(0) => {
            tracing::debug!("debugger exited successfully");
            Ok(())
        }
        code => Err(FlashError::Subprocess { code }),
    }
}
