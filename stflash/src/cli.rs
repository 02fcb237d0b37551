// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use anyhow::{Context, Result};
use clap::Parser;
use stflash_common::{
    Action, AssetIds, ProcessExecutor, DEFAULT_DEBUGGER_CONFIG_ID, DEFAULT_DEBUGGER_ID,
    DEFAULT_FIRMWARE_ID,
};

use crate::runfiles::Runfiles;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "stflash")]
#[command(about = "Flash the application binary to a connected STM32 board through OpenOCD")]
pub struct Cli {
    /// What to do with the board
    #[arg(value_enum, default_value_t = Action::Program)]
    pub action: Action,

    /// Runfiles path of the OpenOCD executable
    #[arg(long, value_name = "ID", env = "STFLASH_OPENOCD", default_value = DEFAULT_DEBUGGER_ID)]
    pub openocd: String,

    /// Runfiles path of the firmware image
    #[arg(long, value_name = "ID", env = "STFLASH_BINARY", default_value = DEFAULT_FIRMWARE_ID)]
    pub binary: String,

    /// Runfiles path of the OpenOCD target configuration
    #[arg(
        long,
        value_name = "ID",
        env = "STFLASH_OPENOCD_CONFIG",
        default_value = DEFAULT_DEBUGGER_CONFIG_ID
    )]
    pub openocd_config: String,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn asset_ids(&self) -> AssetIds {
        AssetIds {
            debugger: self.openocd.clone(),
            firmware: self.binary.clone(),
            debugger_config: self.openocd_config.clone(),
        }
    }
}

/// Execute the parsed CLI command.
pub fn run(cli: &Cli) -> Result<()> {
    let runfiles = Runfiles::create().context("Cannot locate bundled assets")?;
    stflash_common::flash(
        cli.action,
        &cli.asset_ids(),
        &runfiles,
        &mut ProcessExecutor,
    )?;
    Ok(())
}
