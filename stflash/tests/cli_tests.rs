// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! End-to-end tests running the binary against a stub OpenOCD.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const EXECUTABLE_NAME: &str = "stflash";

// Records its arguments and environment, then exits with $STUB_EXIT.
const STUB_OPENOCD: &str = r#"#!/bin/sh
for arg in "$@"; do
    printf '%s\n' "$arg"
done > "$STUB_LOG/args"
printf '%s' "${PW_GDB_PORT-unset}" > "$STUB_LOG/gdb_port"
printf '%s' "${STFLASH_TEST_MARKER-unset}" > "$STUB_LOG/marker"
exit "${STUB_EXIT:-0}"
"#;

struct Fixture {
    _tmp: TempDir,
    runfiles: PathBuf,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let runfiles = tmp.path().join("stflash.runfiles");
        let log = tmp.path().join("log");
        fs::create_dir_all(&log).unwrap();

        let openocd = runfiles.join("openocd/bin/openocd");
        write_file(&openocd, STUB_OPENOCD);
        fs::set_permissions(&openocd, fs::Permissions::from_mode(0o755)).unwrap();

        write_file(&runfiles.join("_main/apps/blinky/application.elf"), "");
        write_file(&runfiles.join("_main/apps/blinky/openocd_stm32l4xx.cfg"), "");

        Self {
            _tmp: tmp,
            runfiles,
            log,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
        cmd.env("RUNFILES_DIR", &self.runfiles)
            .env("STUB_LOG", &self.log)
            .env_remove("RUNFILES_MANIFEST_FILE")
            .env_remove("STFLASH_OPENOCD")
            .env_remove("STFLASH_BINARY")
            .env_remove("STFLASH_OPENOCD_CONFIG")
            .env_remove("PW_GDB_PORT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn path(&self, id: &str) -> String {
        self.runfiles.join(id).display().to_string()
    }

    fn recorded_args(&self) -> Option<Vec<String>> {
        let args = fs::read_to_string(self.log.join("args")).ok()?;
        Some(args.lines().map(str::to_string).collect())
    }

    fn recorded(&self, name: &str) -> String {
        fs::read_to_string(self.log.join(name)).unwrap()
    }
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn should_program_by_default() {
    let fx = Fixture::new();
    fx.command().assert().success();

    assert_eq!(
        fx.recorded_args().unwrap(),
        [
            "-f".to_string(),
            fx.path("_main/apps/blinky/openocd_stm32l4xx.cfg"),
            "-c".to_string(),
            format!(
                "program {} reset exit",
                fx.path("_main/apps/blinky/application.elf")
            ),
        ]
    );
}

#[test]
fn should_match_explicit_program() {
    let fx = Fixture::new();
    fx.command().assert().success();
    let implicit = fx.recorded_args().unwrap();

    fx.command().arg("program").assert().success();
    assert_eq!(fx.recorded_args().unwrap(), implicit);
}

#[test]
fn should_erase_in_order() {
    let fx = Fixture::new();
    fx.command().arg("erase").assert().success();

    assert_eq!(
        fx.recorded_args().unwrap(),
        [
            "-f".to_string(),
            fx.path("_main/apps/blinky/openocd_stm32l4xx.cfg"),
            "-c".to_string(),
            "init".to_string(),
            "-c".to_string(),
            "halt".to_string(),
            "-c".to_string(),
            "flash erase_sector 0 0 last".to_string(),
            "-c".to_string(),
            "shutdown".to_string(),
        ]
    );
}

#[test]
fn should_disable_gdb_port_and_keep_parent_env() {
    let fx = Fixture::new();
    fx.command()
        .env("STFLASH_TEST_MARKER", "kept")
        .assert()
        .success();

    assert_eq!(fx.recorded("gdb_port"), "disabled");
    assert_eq!(fx.recorded("marker"), "kept");
}

#[test]
fn should_reject_unknown_action_without_running_openocd() {
    let fx = Fixture::new();
    let output = fx.command().arg("reset").assert().code(2).get_output().clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value 'reset'"), "{stderr}");
    assert!(stderr.contains("possible values: program, erase"), "{stderr}");
    assert!(fx.recorded_args().is_none());
}

#[test]
fn should_propagate_openocd_failure() {
    let fx = Fixture::new();
    let output = fx
        .command()
        .env("STUB_EXIT", "1")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exit code = 1"), "{stderr}");
    assert!(fx.recorded_args().is_some());
}

#[test]
fn should_pass_through_openocd_exit_code() {
    let fx = Fixture::new();
    fx.command().arg("erase").env("STUB_EXIT", "3").assert().code(3);
}

#[test]
fn should_fail_on_missing_asset_before_running_openocd() {
    let fx = Fixture::new();
    fs::remove_file(fx.runfiles.join("_main/apps/blinky/application.elf")).unwrap();

    let output = fx.command().assert().code(1).get_output().clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("_main/apps/blinky/application.elf"),
        "{stderr}"
    );
    assert!(fx.recorded_args().is_none());
}

#[test]
fn should_accept_asset_overrides() {
    let fx = Fixture::new();
    write_file(&fx.runfiles.join("custom/other.elf"), "");

    fx.command()
        .args(["program", "--binary", "custom/other.elf"])
        .assert()
        .success();

    let args = fx.recorded_args().unwrap();
    assert_eq!(
        args[3],
        format!("program {} reset exit", fx.path("custom/other.elf"))
    );
}

#[test]
fn should_use_runfiles_manifest() {
    let fx = Fixture::new();
    let manifest = fx.log.join("MANIFEST");
    fs::write(
        &manifest,
        format!(
            "openocd {}\n_main {}\n",
            fx.runfiles.join("openocd").display(),
            fx.runfiles.join("_main").display()
        ),
    )
    .unwrap();

    fx.command()
        .env_remove("RUNFILES_DIR")
        .env("RUNFILES_MANIFEST_FILE", &manifest)
        .assert()
        .success();

    let args = fx.recorded_args().unwrap();
    assert_eq!(args[1], fx.path("_main/apps/blinky/openocd_stm32l4xx.cfg"));
}

#[test]
fn should_fail_without_runfiles() {
    let fx = Fixture::new();
    fx.command()
        .env_remove("RUNFILES_DIR")
        .assert()
        .code(1);
    assert!(fx.recorded_args().is_none());
}

#[test]
fn should_resolve_openocd_through_repo_mapping() {
    let fx = Fixture::new();
    fs::rename(
        fx.runfiles.join("openocd"),
        fx.runfiles.join("+_repo_rules+openocd"),
    )
    .unwrap();
    fs::write(
        fx.runfiles.join("_repo_mapping"),
        ",openocd,+_repo_rules+openocd\n",
    )
    .unwrap();

    fx.command().assert().success();

    let args = fx.recorded_args().unwrap();
    assert_eq!(
        args[3],
        format!(
            "program {} reset exit",
            fx.path("_main/apps/blinky/application.elf")
        )
    );
}
