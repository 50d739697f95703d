#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sales_pulse::{
    loader::{self, LoadOptions, RawTable},
    pipeline::{self, CleanOutcome},
};
use tempfile::{TempDir, tempdir};

pub const HEADER: &str = "Date,Time of Day,Service Type,Ad Channel,Customer Type,Ad Spend ($),Conversions,Daily Revenue ($)";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    fs::read(fixture_path(name)).expect("read fixture")
}

/// A CSV upload with the required header followed by `rows`.
pub fn sales_csv(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

pub fn load_csv(text: &str) -> RawTable {
    loader::load(text.as_bytes(), &LoadOptions::default()).expect("load csv")
}

/// The bundled sample fixture, validated and cleaned.
pub fn sample_outcome() -> CleanOutcome {
    let table = loader::load(&fixture_bytes("sales_sample.csv"), &LoadOptions::default())
        .expect("load sample");
    pipeline::validate_and_clean(&table).expect("clean sample")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
