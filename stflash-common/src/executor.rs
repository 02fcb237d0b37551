// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Debugger process execution.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::Command;

use crate::error::FlashError;
use crate::sequence::CommandSequence;
use crate::{GDB_PORT_DISABLED, GDB_PORT_VAR};

/// Variables added on top of the inherited environment of the debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverrides(Vec<(String, String)>);

impl Default for EnvOverrides {
    /// The OpenOCD config opens a GDB port unless told otherwise.
    fn default() -> Self {
        Self(vec![(GDB_PORT_VAR.to_string(), GDB_PORT_DISABLED.to_string())])
    }
}

impl EnvOverrides {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The environment a child sees when started from `parent`.
    ///
    /// Every parent variable is kept; overrides win on conflicts.
    pub fn merged_with<I>(&self, parent: I) -> BTreeMap<OsString, OsString>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env: BTreeMap<_, _> = parent.into_iter().collect();
        for (key, value) in self.iter() {
            env.insert(key.into(), value.into());
        }
        env
    }
}

/// Runs a debugger command line to completion.
pub trait Executor {
    /// Run `command` with `env` added to the inherited environment and wait for it.
    ///
    /// Returns the exit code, or `None` if the process was killed by a signal.
    fn execute(
        &mut self,
        command: &CommandSequence,
        env: &EnvOverrides,
    ) -> Result<Option<i32>, FlashError>;
}

/// Spawns the debugger as a child process sharing the terminal.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(
        &mut self,
        command: &CommandSequence,
        env: &EnvOverrides,
    ) -> Result<Option<i32>, FlashError> {
        // stdio is inherited; no timeout, erasing a large part can take a while.
        let status = Command::new(command.program())
            .args(command.args())
            .env_clear()
            .envs(env.merged_with(std::env::vars_os()))
            .status()
            .map_err(|source| FlashError::Launch {
                program: command.program().to_string(),
                source,
            })?;

        tracing::debug!(%status, "debugger terminated");
        Ok(status.code())
    }
}
