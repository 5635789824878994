use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// The repository root: `--root`/`CRPI_ROOT` if given, else the current directory.
pub fn repo_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    if !root.is_dir() {
        bail!("repository root {} is not a directory", root.display());
    }
    root.canonicalize()
        .with_context(|| format!("resolving repository root {}", root.display()))
}

/// Pin a relative program path (`./tools/make`) to the current directory.
///
/// Steps run in other directories, so a relative path would otherwise be
/// looked up against each step's directory. Bare names stay PATH lookups.
pub fn program(name: &str) -> Result<String> {
    let path = Path::new(name);
    if path.is_absolute() || path.components().count() < 2 {
        return Ok(name.to_string());
    }
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(cwd.join(path).to_string_lossy().into_owned())
}
