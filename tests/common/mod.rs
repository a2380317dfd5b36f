#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pairwise_gvcf::{AlignedPair, AlignerError, PairwiseAligner};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("PAIRWISE_GVCF_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set PAIRWISE_GVCF_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

/// Aligner that ignores its inputs and returns fixed rows.
#[derive(Debug, Clone)]
pub struct FixedAligner {
    reference: Vec<u8>,
    alternate: Vec<u8>,
}

impl FixedAligner {
    pub fn new(reference: &str, alternate: &str) -> Self {
        Self {
            reference: reference.as_bytes().to_vec(),
            alternate: alternate.as_bytes().to_vec(),
        }
    }
}

impl PairwiseAligner for FixedAligner {
    fn align(&self, _: &[u8], _: &[u8]) -> Result<AlignedPair, AlignerError> {
        AlignedPair::new(self.reference.clone(), self.alternate.clone())
    }
}

/// Drop gap characters from an aligned row.
pub fn ungapped(row: &str) -> Vec<u8> {
    row.bytes().filter(|&b| b != b'-').collect()
}
