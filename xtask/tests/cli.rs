// End-to-end runs of the crpi-build binary against a scratch repository tree,
// with a stub make that logs its working directory and arguments.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const LIBRARY_DIRS: &[&str] = &[
    "Libraries/Math",
    "Libraries/Serial",
    "Clustering/Patterns",
    "Clustering/Cluster",
    "Clustering/kMeans",
    "Libraries/CRPI",
    "Libraries/MotionPrims",
];

struct Repo {
    tmp: TempDir,
}

impl Repo {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        for dir in LIBRARY_DIRS {
            fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
        }
        Self { tmp }
    }

    fn root(&self) -> PathBuf {
        self.tmp.path().join("repo").canonicalize().unwrap()
    }

    fn log(&self) -> PathBuf {
        self.tmp.path().join("make.log")
    }

    fn run(&self, args: &[&str], fail_dir: &str) -> Output {
        let fake_make = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fake-make.sh");
        fs::set_permissions(&fake_make, fs::Permissions::from_mode(0o755)).unwrap();

        Command::new(env!("CARGO_BIN_EXE_crpi-build"))
            .arg("--root")
            .arg(self.root())
            .arg("--make")
            .arg(&fake_make)
            .args(args)
            .env("CRPI_TEST_LOG", self.log())
            .env("CRPI_TEST_FAIL_DIR", fail_dir)
            .env_remove("CRPI_ROOT")
            .output()
            .unwrap()
    }

    /// (directory relative to the root, make arguments) for every make call.
    fn calls(&self) -> Vec<(String, String)> {
        let Ok(log) = fs::read_to_string(self.log()) else {
            return Vec::new();
        };
        let root = self.root();
        log.lines()
            .map(|line| {
                let (dir, args) = line.split_once('|').unwrap();
                let rel = Path::new(dir).strip_prefix(&root).unwrap();
                (rel.display().to_string(), args.to_string())
            })
            .collect()
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn test_no_arguments_only_reports_completion() {
    let repo = Repo::new();
    let out = repo.run(&[], "");

    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "done");
    assert!(repo.calls().is_empty());
}

#[test]
fn test_build_all_runs_every_library_in_order() {
    let repo = Repo::new();
    let out = repo.run(&["-a"], "");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let expected: Vec<_> = LIBRARY_DIRS
        .iter()
        .map(|dir| ((*dir).to_string(), String::new()))
        .collect();
    assert_eq!(repo.calls(), expected);

    let text = stdout(&out);
    let math = text.find("math").unwrap();
    let prims = text.find("Motion Prims").unwrap();
    assert!(math < prims);
    assert_eq!(text.lines().last(), Some("done"));
}

#[test]
fn test_clean_all() {
    let repo = Repo::new();
    let out = repo.run(&["-c"], "");

    assert!(out.status.success());
    let calls = repo.calls();
    assert_eq!(calls.len(), LIBRARY_DIRS.len());
    assert!(calls.iter().all(|(_, args)| args == "clean"));
}

#[test]
fn test_failure_does_not_stop_later_libraries() {
    let repo = Repo::new();
    let out = repo.run(&["-a"], "Serial");

    assert!(!out.status.success());
    assert_eq!(repo.calls().len(), LIBRARY_DIRS.len());
    let text = stdout(&out);
    assert!(text.contains("[FAIL] serial"));
    assert!(text.contains("6 of 7 steps succeeded"));
    assert_eq!(text.lines().last(), Some("done"));
}

#[test]
fn test_plus_builds_all_then_each_target() {
    let repo = Repo::new();
    let out = repo.run(&["-plus", "target1", "target2"], "");

    assert!(out.status.success());
    assert_eq!(
        repo.calls(),
        [
            (String::new(), "all".to_string()),
            (String::new(), "target1".to_string()),
            (String::new(), "target2".to_string()),
        ]
    );
}

#[test]
fn test_plus_without_targets_prints_usage() {
    let repo = Repo::new();
    let out = repo.run(&["-plus"], "");

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Please refer to readme for instructions on usage"));
    assert_eq!(text.lines().last(), Some("done"));
    assert!(repo.calls().is_empty());
}

#[test]
fn test_unknown_flag_prints_usage() {
    let repo = Repo::new();
    let out = repo.run(&["-x"], "");

    assert!(out.status.success());
    assert!(stdout(&out).contains("Please refer to readme"));
    assert!(repo.calls().is_empty());
}

#[test]
fn test_missing_library_directory_is_reported() {
    let repo = Repo::new();
    fs::remove_dir(repo.root().join("Libraries/CRPI")).unwrap();
    let out = repo.run(&["-a"], "");

    assert!(!out.status.success());
    assert_eq!(repo.calls().len(), LIBRARY_DIRS.len() - 1);
    assert!(stdout(&out).contains("[skip] CRPI: missing directory"));
}

#[test]
fn test_summary_file() {
    let repo = Repo::new();
    let summary = repo.tmp.path().join("summary.json");
    let out = repo.run(&["--summary", summary.to_str().unwrap(), "-a"], "kMeans");

    assert!(!out.status.success());
    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(doc["succeeded"], false);
    let steps = doc["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[4]["label"], "kMeans");
    assert_eq!(steps[4]["status"], "failed");
    assert_eq!(steps[4]["code"], 2);
}

#[test]
fn test_bad_manifest_is_fatal_but_still_completes() {
    let repo = Repo::new();
    let manifest = repo.tmp.path().join("plan.json");
    fs::write(&manifest, "{ not json").unwrap();
    let out = repo.run(&["--manifest", manifest.to_str().unwrap(), "-a"], "");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("parsing build manifest"));
    assert_eq!(stdout(&out).trim(), "done");
    assert!(repo.calls().is_empty());
}

/// Runs the binary with only `args`, taking the root from `CRPI_ROOT`.
fn run_with_env_root(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crpi-build"))
        .args(args)
        .env("CRPI_ROOT", root)
        .output()
        .unwrap()
}

#[test]
fn test_usage_does_not_need_a_valid_root() {
    let out = run_with_env_root(Path::new("/nonexistent-crpi-root"), &["-x"]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("Please refer to readme for instructions on usage"));
    assert_eq!(text.lines().last(), Some("done"));
}

#[test]
fn test_no_arguments_do_not_need_a_valid_root_or_manifest() {
    let out = run_with_env_root(Path::new("/nonexistent-crpi-root"), &[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out).trim(), "done");

    let tmp = TempDir::new().unwrap();
    let manifest = tmp.path().join("plan.json");
    fs::write(&manifest, "{ not json").unwrap();
    let out = run_with_env_root(
        Path::new("/nonexistent-crpi-root"),
        &["--manifest", manifest.to_str().unwrap(), "-plus"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("Please refer to readme"));
}

#[test]
fn test_build_with_missing_root_is_fatal() {
    let out = run_with_env_root(Path::new("/nonexistent-crpi-root"), &["-a"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("is not a directory"));
    assert_eq!(stdout(&out).trim(), "done");
}
