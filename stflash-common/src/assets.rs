// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bundled asset identifiers and their resolution to filesystem paths.

use core::fmt;
use std::path::PathBuf;

use crate::error::FlashError;
use crate::{DEFAULT_DEBUGGER_CONFIG_ID, DEFAULT_DEBUGGER_ID, DEFAULT_FIRMWARE_ID};

/// Maps a logical asset identifier to a path on disk.
///
/// Returns `None` when the identifier is unknown or the file is missing.
pub trait AssetResolver {
    fn resolve(&self, id: &str) -> Option<PathBuf>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn resolve(&self, id: &str) -> Option<PathBuf> {
        self(id)
    }
}

/// The three assets needed to flash a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Debugger,
    Firmware,
    DebuggerConfig,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Debugger => "openocd executable",
            AssetKind::Firmware => "firmware binary",
            AssetKind::DebuggerConfig => "openocd config",
        })
    }
}

/// Logical identifiers of the assets, as handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIds {
    pub debugger: String,
    pub firmware: String,
    pub debugger_config: String,
}

impl Default for AssetIds {
    fn default() -> Self {
        Self {
            debugger: DEFAULT_DEBUGGER_ID.to_string(),
            firmware: DEFAULT_FIRMWARE_ID.to_string(),
            debugger_config: DEFAULT_DEBUGGER_CONFIG_ID.to_string(),
        }
    }
}

/// Resolved asset locations. All three are non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub debugger: PathBuf,
    pub firmware: PathBuf,
    pub debugger_config: PathBuf,
}

impl AssetPaths {
    /// Resolve every identifier in `ids`, failing on the first missing asset.
    pub fn resolve<R>(ids: &AssetIds, resolver: &R) -> Result<Self, FlashError>
    where
        R: AssetResolver + ?Sized,
    {
        let lookup = |kind: AssetKind, id: &str| {
            let path = resolver
                .resolve(id)
                .filter(|path| !path.as_os_str().is_empty());
            tracing::trace!(%kind, id, ?path, "resolved asset");
            path.ok_or_else(|| FlashError::AssetResolution {
                asset: kind,
                id: id.to_string(),
            })
        };

        Ok(Self {
            debugger: lookup(AssetKind::Debugger, &ids.debugger)?,
            firmware: lookup(AssetKind::Firmware, &ids.firmware)?,
            debugger_config: lookup(AssetKind::DebuggerConfig, &ids.debugger_config)?,
        })
    }
}
