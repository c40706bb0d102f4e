//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// One pack directory to place under `index/` in a fixture archive.
pub struct PackFixture<'a> {
    pub id: &'a str,
    /// Raw `metadata.json` body; `None` leaves the pack without metadata.
    pub metadata: Option<&'a str>,
}

pub fn pack<'a>(id: &'a str, metadata: &'a str) -> PackFixture<'a> {
    PackFixture {
        id,
        metadata: Some(metadata),
    }
}

/// Write a zip with an `index/` root holding the given packs.
pub fn write_index_zip(path: &Path, packs: &[PackFixture<'_>]) {
    write_zip(path, "index", packs);
}

pub fn write_zip(path: &Path, root: &str, packs: &[PackFixture<'_>]) {
    let mut writer = zip::ZipWriter::new(File::create(path).expect("create zip"));
    let options = SimpleFileOptions::default();
    writer
        .add_directory(format!("{root}/"), options)
        .expect("add root");
    for pack in packs {
        writer
            .add_directory(format!("{root}/{}/", pack.id), options)
            .expect("add pack dir");
        if let Some(metadata) = pack.metadata {
            writer
                .start_file(format!("{root}/{}/metadata.json", pack.id), options)
                .expect("start metadata");
            writer
                .write_all(metadata.as_bytes())
                .expect("write metadata");
        }
    }
    writer.finish().expect("finish zip");
}

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::write(&path, body).expect("write workspace file");
        path
    }

    /// Run the binary with an isolated config dir so a user config never leaks in.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_new-packs"))
            .args(args)
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("HOME", self.dir.path())
            .env_remove("NEW_PACKS_LOG")
            .output()
            .expect("run new-packs")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
