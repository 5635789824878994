//! Build plan: which library directories are built, and in what order.
//!
//! The built-in plan mirrors the CRPI source tree. A JSON manifest with the
//! same shape replaces it wholesale (`--manifest`).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Library directories as (label, path relative to the repository root).
///
/// Order matters: later libraries link against earlier ones.
pub const LIBRARIES: &[(&str, &str)] = &[
    ("math", "Libraries/Math"),
    ("serial", "Libraries/Serial"),
    ("Patterns", "Clustering/Patterns"),
    ("Cluster", "Clustering/Cluster"),
    ("kMeans", "Clustering/kMeans"),
    ("CRPI", "Libraries/CRPI"),
    ("Motion Prims", "Libraries/MotionPrims"),
];

/// A directory with its own Makefile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Printed before the unit's step runs.
    pub label: String,
    /// Relative to the repository root.
    pub dir: PathBuf,
}

/// Where the bundled ULAPI tarball lives and how its self-test is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UlapiLayout {
    pub enabled: bool,
    /// Directory holding the tarball and the expected self-test log.
    pub dir: PathBuf,
    pub archive: String,
    /// Directory the tarball unpacks into, relative to `dir`.
    pub source_dir: String,
    pub prefix: String,
    /// Self-test binary, relative to `source_dir`.
    pub self_test: String,
    /// Self-test output, written inside `source_dir`.
    pub log_file: String,
    /// Known-good self-test output, inside `dir`.
    pub expected_log: String,
    /// Mismatch report, written inside `dir`.
    pub report_file: String,
    /// Label of the unit the bootstrap must run before.
    pub before: String,
}

impl Default for UlapiLayout {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("Libraries/ulapi"),
            archive: "ulapi-1.X.tar.gz".to_string(),
            source_dir: "ulapi-1.X".to_string(),
            prefix: "/usr/local/ulapi".to_string(),
            self_test: "bin/ultest".to_string(),
            log_file: "installlog.txt".to_string(),
            expected_log: "install_compare.txt".to_string(),
            report_file: crate::compare::REPORT_FILE.to_string(),
            before: "CRPI".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub units: Vec<Unit>,
    #[serde(default)]
    pub ulapi: UlapiLayout,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            units: LIBRARIES
                .iter()
                .map(|(label, dir)| Unit {
                    label: (*label).to_string(),
                    dir: PathBuf::from(dir),
                })
                .collect(),
            ulapi: UlapiLayout::default(),
        }
    }
}

impl Plan {
    /// The manifest at `path` if given, otherwise the built-in plan.
    pub fn resolve(manifest: Option<&Path>) -> Result<Self> {
        match manifest {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)
            .with_context(|| format!("reading build manifest '{}'", path.display()))?;
        let plan: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("parsing build manifest '{}'", path.display()))?;
        plan.validate()
            .with_context(|| format!("invalid build manifest '{}'", path.display()))?;
        log::debug!("loaded {} units from {}", plan.units.len(), path.display());
        Ok(plan)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for unit in &self.units {
            if unit.label.trim().is_empty() {
                bail!("unit for '{}' has an empty label", unit.dir.display());
            }
            if !seen.insert(unit.label.as_str()) {
                bail!("duplicate unit label '{}'", unit.label);
            }
        }
        Ok(())
    }

    /// Position in `units` where the ULAPI bootstrap runs.
    ///
    /// Falls back to the end of the plan when no unit carries the `before` label.
    pub fn ulapi_position(&self) -> usize {
        self.units
            .iter()
            .position(|unit| unit.label == self.ulapi.before)
            .unwrap_or(self.units.len())
    }
}
