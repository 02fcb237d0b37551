// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! User-facing flashing actions.

use core::fmt;
use core::str::FromStr;

use crate::error::FlashError;

/// What to do with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Action {
    /// Write the firmware image, reset the target and exit
    #[default]
    Program,
    /// Halt the core and erase every flash sector
    Erase,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Program, Action::Erase];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Program => "program",
            Action::Erase => "erase",
        }
    }

    /// Select the action from an optional positional argument.
    ///
    /// `None` selects [`Action::Program`]. This is the entry point for callers
    /// that do not parse their command line with clap; the `stflash` binary
    /// validates through the `cli` feature's `ValueEnum` instead, which
    /// reports unknown actions as clap usage errors with the same exit code.
    pub fn select(arg: Option<&str>) -> Result<Self, FlashError> {
        arg.map_or(Ok(Action::default()), str::parse)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| FlashError::InvalidArgument(s.to_string()))
    }
}
