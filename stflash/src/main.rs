// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash the application binary to a connected STM32 board through OpenOCD.
//!
//! Usage:
//!   stflash            # same as `stflash program`
//!   stflash program
//!   stflash erase

mod cli;
mod logging;
mod runfiles;

use std::process::ExitCode;

use clap::Parser;
use stflash_common::FlashError;

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Warning: {e:#}");
    }

    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<FlashError>().map_or(1, FlashError::exit_code);
            ExitCode::from(code)
        }
    }
}
