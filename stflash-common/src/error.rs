// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

use thiserror::Error;

use crate::assets::AssetKind;

/// Everything that can stop a flashing run.
#[derive(Debug, Error)]
pub enum FlashError {
    #[error("could not locate the {asset} (`{id}`)")]
    AssetResolution { asset: AssetKind, id: String },

    /// Produced by [`Action::select`](crate::Action::select) and `FromStr`;
    /// clap front ends reject unknown actions before reaching the library.
    #[error("invalid action '{0}' (possible values: program, erase)")]
    InvalidArgument(String),

    #[error("failed to launch '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("openocd failed: {}", describe_exit(.code))]
    Subprocess { code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code = {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl FlashError {
    /// Process exit code to report for this error.
    ///
    /// A failing debugger's own exit code is passed through when it fits in a
    /// process exit status; everything else maps to 1, except invalid
    /// arguments which use 2 like clap's usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            FlashError::InvalidArgument(_) => 2,
            FlashError::Subprocess { code: Some(code) } => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}
