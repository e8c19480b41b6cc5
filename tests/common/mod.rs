#![allow(dead_code)]

pub mod drive_server;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use samplefetch::{FetchError, RemoteSource, SampleRegistry, Transfer};

/// Transfer that writes the remote reference as the file body and records
/// every attempt. Optionally fails on the N-th attempt (0-based).
#[derive(Default)]
pub struct RecordingTransfer {
    pub attempts: RefCell<Vec<(RemoteSource, PathBuf)>>,
    pub fail_on: Option<usize>,
}

impl RecordingTransfer {
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            attempts: RefCell::default(),
            fail_on: Some(attempt),
        }
    }

    pub fn sources(&self) -> Vec<RemoteSource> {
        self.attempts
            .borrow()
            .iter()
            .map(|(source, _)| source.clone())
            .collect()
    }

    pub fn outputs(&self) -> Vec<PathBuf> {
        self.attempts
            .borrow()
            .iter()
            .map(|(_, output)| output.clone())
            .collect()
    }
}

impl Transfer for RecordingTransfer {
    fn transfer(&self, source: &RemoteSource, output: &Path) -> Result<(), FetchError> {
        let attempt = self.attempts.borrow().len();
        self.attempts
            .borrow_mut()
            .push((source.clone(), output.to_path_buf()));

        if self.fail_on == Some(attempt) {
            return Err(FetchError::TransferFailed {
                remote: source.as_str().to_string(),
                message: "simulated network failure".to_string(),
            });
        }

        fs::write(output, source.as_str())?;
        Ok(())
    }
}

/// Registry used across the integration tests.
pub fn test_registry() -> SampleRegistry {
    SampleRegistry::new()
        .with_file("probe", "1ProbeFileId")
        .with_file("mirror", "http://example.org/mirror.h5")
        .with_collection(
            "calibration",
            [
                ("dark.h5", "1DarkId"),
                ("flat.h5", "https://example.org/flat.h5"),
                ("gain.h5", "1GainId"),
            ],
        )
        .expect("valid collection")
        .with_collection("single", [("only.dm3", "1OnlyId")])
        .expect("valid collection")
}

/// Snapshot of every file directly inside `dir`: name -> bytes.
pub fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            let entry = entry.expect("entry");
            let name = entry.file_name().to_string_lossy().to_string();
            let bytes = if entry.file_type().expect("file type").is_file() {
                fs::read(entry.path()).expect("read file")
            } else {
                Vec::new()
            };
            (name, bytes)
        })
        .collect()
}
