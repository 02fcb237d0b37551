// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! OpenOCD command line construction.

use core::fmt;

use crate::action::Action;
use crate::assets::AssetPaths;

/// Directives for a full-chip erase, in the order OpenOCD must run them.
pub const ERASE_DIRECTIVES: [&str; 4] = ["init", "halt", "flash erase_sector 0 0 last", "shutdown"];

/// Full argument vector for one debugger run. Token 0 is the debugger itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSequence(Vec<String>);

impl CommandSequence {
    /// Build the OpenOCD invocation for `action`.
    pub fn build(action: Action, paths: &AssetPaths) -> Self {
        let mut tokens = vec![
            paths.debugger.display().to_string(),
            "-f".to_string(),
            paths.debugger_config.display().to_string(),
        ];

        match action {
            // One directive: OpenOCD runs program/reset/exit as a single script line.
            Action::Program => {
                tokens.push("-c".to_string());
                tokens.push(format!("program {} reset exit", paths.firmware.display()));
            }
            Action::Erase => {
                for directive in ERASE_DIRECTIVES {
                    tokens.push("-c".to_string());
                    tokens.push(directive.to_string());
                }
            }
        }

        Self(tokens)
    }

    /// Path of the program to run.
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Arguments following the program.
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// The `-c` directives, in order.
    pub fn directives(&self) -> impl Iterator<Item = &str> {
        self.0
            .windows(2)
            .filter(|pair| pair[0] == "-c")
            .map(|pair| pair[1].as_str())
    }
}

impl fmt::Display for CommandSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if token.contains(' ') {
                write!(f, "\"{token}\"")?;
            } else {
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}
