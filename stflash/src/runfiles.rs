// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Runfiles lookup for assets bundled next to the tool by the build system.
//!
//! Two layouts are supported: a manifest file mapping runfiles paths to real
//! paths, and a plain directory tree. The layout is discovered from the
//! `RUNFILES_MANIFEST_FILE` / `RUNFILES_DIR` variables set by the launcher,
//! falling back to `<exe>.runfiles_manifest`, `<exe>.runfiles/MANIFEST` and
//! `<exe>.runfiles` next to the running executable.
//!
//! Identifiers whose first segment is an apparent repository name of the
//! main repository are translated through `_repo_mapping` when the build
//! produced one.

use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use stflash_common::AssetResolver;
use thiserror::Error;

pub const MANIFEST_FILE_VAR: &str = "RUNFILES_MANIFEST_FILE";
pub const DIR_VAR: &str = "RUNFILES_DIR";
pub const REPO_MAPPING: &str = "_repo_mapping";

#[derive(Debug, Error)]
pub enum RunfilesError {
    #[error(
        "no runfiles found (set {} or {}, or run through the build system)",
        DIR_VAR,
        MANIFEST_FILE_VAR
    )]
    NotFound,
    #[error("failed to read runfiles manifest {}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to locate the running executable")]
    CurrentExe(#[source] std::io::Error),
}

#[derive(Debug)]
enum Mode {
    Manifest(HashMap<String, String>),
    Directory(PathBuf),
}

/// Resolves runfiles identifiers to paths on disk.
#[derive(Debug)]
pub struct Runfiles {
    mode: Mode,
    /// Apparent repository name -> canonical name, as seen from the main repository.
    repo_mapping: HashMap<String, String>,
}

impl Runfiles {
    /// Discover the runfiles of the current process.
    pub fn create() -> Result<Self, RunfilesError> {
        if let Some(manifest) = env::var_os(MANIFEST_FILE_VAR).map(PathBuf::from) {
            if manifest.is_file() {
                return Self::from_manifest(&manifest);
            }
        }

        if let Some(dir) = env::var_os(DIR_VAR).map(PathBuf::from) {
            if dir.is_dir() {
                return Ok(Self::from_directory(dir));
            }
        }

        let exe = env::current_exe().map_err(RunfilesError::CurrentExe)?;
        Self::next_to(&exe)
    }

    /// Discover runfiles bundled beside `exe`.
    pub fn next_to(exe: &Path) -> Result<Self, RunfilesError> {
        let with_suffix = |suffix: &str| {
            let mut path = exe.as_os_str().to_owned();
            path.push(suffix);
            PathBuf::from(path)
        };

        let dir = with_suffix(".runfiles");
        for manifest in [with_suffix(".runfiles_manifest"), dir.join("MANIFEST")] {
            if manifest.is_file() {
                return Self::from_manifest(&manifest);
            }
        }

        if dir.is_dir() {
            return Ok(Self::from_directory(dir));
        }

        Err(RunfilesError::NotFound)
    }

    pub fn from_manifest(path: &Path) -> Result<Self, RunfilesError> {
        let contents = fs::read_to_string(path).map_err(|source| RunfilesError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("using runfiles manifest {}", path.display());

        let entries = parse_manifest(&contents);
        let repo_mapping = entries
            .get(REPO_MAPPING)
            .filter(|value| !value.is_empty())
            .map(|value| load_repo_mapping(Path::new(value)))
            .unwrap_or_default();

        Ok(Self {
            mode: Mode::Manifest(entries),
            repo_mapping,
        })
    }

    pub fn from_directory(dir: PathBuf) -> Self {
        tracing::debug!("using runfiles directory {}", dir.display());
        let mapping = dir.join(REPO_MAPPING);
        let repo_mapping = if mapping.is_file() {
            load_repo_mapping(&mapping)
        } else {
            HashMap::new()
        };

        Self {
            mode: Mode::Directory(dir),
            repo_mapping,
        }
    }

    /// Location of the runfile `id`, if it exists.
    pub fn rlocation(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || Path::new(id).components().any(|c| c == Component::ParentDir) {
            return None;
        }

        let path = Path::new(id);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        let id = self.apply_repo_mapping(id);
        match &self.mode {
            Mode::Manifest(entries) => lookup_manifest(entries, &id),
            Mode::Directory(dir) => {
                let path = dir.join(&*id);
                path.exists().then_some(path)
            }
        }
    }

    /// Replace a leading apparent repository name with its canonical name.
    ///
    /// Identifiers without a mapping are used literally.
    fn apply_repo_mapping<'a>(&self, id: &'a str) -> Cow<'a, str> {
        let (repo, rest) = match id.split_once('/') {
            Some(parts) => parts,
            None => return Cow::Borrowed(id),
        };

        match self.repo_mapping.get(repo) {
            Some(canonical) => {
                tracing::trace!(repo, %canonical, "mapped repository");
                Cow::Owned(format!("{canonical}/{rest}"))
            }
            None => Cow::Borrowed(id),
        }
    }
}

impl AssetResolver for Runfiles {
    fn resolve(&self, id: &str) -> Option<PathBuf> {
        self.rlocation(id)
    }
}

fn parse_manifest(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            // A leading space marks an entry with `\s`, `\n` and `\b` escapes.
            let (escaped, line) = match line.strip_prefix(' ') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            if escaped {
                (unescape_manifest(key), unescape_manifest(value))
            } else {
                (key.to_string(), value.to_string())
            }
        })
        .collect()
}

fn unescape_manifest(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('b') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Read the mappings visible from the main repository.
///
/// Each line is `source_canonical,target_apparent,target_canonical`; the main
/// repository's canonical name is empty and its runfiles live under `_main`.
fn load_repo_mapping(path: &Path) -> HashMap<String, String> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_repo_mapping(&contents),
        Err(e) => {
            tracing::warn!("ignoring unreadable repo mapping {}: {e}", path.display());
            HashMap::new()
        }
    }
}

fn parse_repo_mapping(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, ',');
            let source = fields.next()?;
            let apparent = fields.next()?;
            let canonical = fields.next()?;
            if !(source.is_empty() || source == "_main") || apparent.is_empty() {
                return None;
            }
            let canonical = if canonical.is_empty() { "_main" } else { canonical };
            Some((apparent.to_string(), canonical.to_string()))
        })
        .collect()
}

fn lookup_manifest(entries: &HashMap<String, String>, id: &str) -> Option<PathBuf> {
    if let Some(value) = entries.get(id) {
        return (!value.is_empty()).then(|| PathBuf::from(value));
    }

    // A directory entry covers everything below it.
    let mut prefix = id;
    while let Some((parent, _)) = prefix.rsplit_once('/') {
        if let Some(value) = entries.get(parent).filter(|v| !v.is_empty()) {
            let rest = &id[parent.len() + 1..];
            return Some(Path::new(value).join(rest));
        }
        prefix = parent;
    }

    None
}
