//! Line-by-line comparison of a log against its expected contents.
//!
//! Only as many lines as the first file holds are compared. A line the second
//! file lacks counts as a mismatch. Every mismatch is written to a report
//! file that is truncated on each run, so an empty report means a clean match.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default name of the mismatch report.
pub const REPORT_FILE: &str = "ulapiBuild.txt";

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompareError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One differing line pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number.
    pub line: usize,
    pub left: String,
    /// `None` when the second file ran out of lines.
    pub right: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diff [line {}]: {} -- {}",
            self.line,
            self.left,
            self.right.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Default)]
pub struct Comparison {
    pub mismatches: Vec<Mismatch>,
}

impl Comparison {
    pub fn identical(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare `left` against `right` line by line, writing mismatches to `report`.
///
/// Inputs are opened before the report is touched, so a missing input leaves
/// any previous report in place. Line terminators (`\n`, `\r\n`) are not part
/// of the comparison.
pub fn compare(left: &Path, right: &Path, report: &Path) -> Result<Comparison, CompareError> {
    let left_lines = open(left)?.lines();
    let mut right_lines = open(right)?.lines();
    let mut out = File::create(report)
        .map(BufWriter::new)
        .map_err(|e| CompareError::io(report, e))?;

    let mut comparison = Comparison::default();
    for (index, line) in left_lines.enumerate() {
        let line = line.map_err(|e| CompareError::io(left, e))?;
        let other = right_lines
            .next()
            .transpose()
            .map_err(|e| CompareError::io(right, e))?;

        if other.as_deref() != Some(line.as_str()) {
            let mismatch = Mismatch {
                line: index + 1,
                left: line,
                right: other,
            };
            writeln!(out, "{mismatch}").map_err(|e| CompareError::io(report, e))?;
            comparison.mismatches.push(mismatch);
        }
    }

    out.flush().map_err(|e| CompareError::io(report, e))?;
    log::debug!(
        "compared {} against {}: {} mismatches",
        left.display(),
        right.display(),
        comparison.mismatches.len()
    );
    Ok(comparison)
}

fn open(path: &Path) -> Result<BufReader<File>, CompareError> {
    File::open(path).map(BufReader::new).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CompareError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CompareError::io(path, source)
        }
    })
}
