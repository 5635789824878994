//! Running build steps as child processes.
//!
//! Every step names its own working directory. The tool never changes its
//! own current directory, so steps can be reordered without side effects.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    /// Redirect stdout into this file, relative to `dir`.
    pub stdout_to: Option<PathBuf>,
}

impl Step {
    pub fn new(label: impl Into<String>, dir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            dir: dir.into(),
            program: program.into(),
            args: Vec::new(),
            stdout_to: None,
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn stdout_to(mut self, file: impl Into<PathBuf>) -> Self {
        self.stdout_to = Some(file.into());
        self
    }

    /// Shell-like rendering for logs and summaries.
    pub fn command_line(&self) -> String {
        let mut line = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(file) = &self.stdout_to {
            line.push_str(&format!(" > {}", file.display()));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    /// Exited unsuccessfully; `code` is `None` when killed by a signal.
    Failed { code: Option<i32> },
    /// Never started (missing directory, unspawnable program, failed prerequisite).
    NotRun { reason: String },
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed { code: Some(code) } => write!(f, "exited with status {code}"),
            Self::Failed { code: None } => f.write_str("terminated by signal"),
            Self::NotRun { reason } => write!(f, "not run: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub label: String,
    pub dir: PathBuf,
    /// Empty for checks the tool performs itself.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(flatten)]
    pub status: StepStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl StepOutcome {
    pub fn new(step: &Step, status: StepStatus) -> Self {
        Self {
            label: step.label.clone(),
            dir: step.dir.clone(),
            command: step.command_line(),
            status,
            output: String::new(),
        }
    }

    /// Outcome of an in-process check rather than an external command.
    pub fn check(label: &str, dir: PathBuf, status: StepStatus) -> Self {
        Self {
            label: label.to_string(),
            dir,
            command: String::new(),
            status,
            output: String::new(),
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: String) -> Self {
        self.output = output;
        self
    }

    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}

/// Executes steps on behalf of the build/clean tasks.
pub trait Runner {
    /// Fails when a tool the upcoming steps need is unavailable.
    fn preflight(&self, _tools: &[&str]) -> Result<()> {
        Ok(())
    }

    fn run(&mut self, step: &Step) -> StepOutcome;
}

/// Spawns each step as a child process and waits for it.
#[derive(Debug, Default)]
pub struct ProcessRunner {
    capture: bool,
}

impl ProcessRunner {
    pub fn new(capture: bool) -> Self {
        Self { capture }
    }
}

impl Runner for ProcessRunner {
    fn preflight(&self, tools: &[&str]) -> Result<()> {
        for tool in tools {
            if which::which(tool).is_err() {
                bail!("missing `{tool}` in PATH");
            }
        }
        Ok(())
    }

    fn run(&mut self, step: &Step) -> StepOutcome {
        if !step.dir.is_dir() {
            return StepOutcome::new(
                step,
                StepStatus::NotRun {
                    reason: format!("missing directory {}", step.dir.display()),
                },
            );
        }

        let mut cmd = Command::new(program_path(&step.dir, &step.program));
        cmd.args(&step.args).current_dir(&step.dir);

        if let Some(file) = &step.stdout_to {
            let path = step.dir.join(file);
            match File::create(&path) {
                Ok(f) => {
                    cmd.stdout(Stdio::from(f));
                }
                Err(e) => {
                    return StepOutcome::new(
                        step,
                        StepStatus::NotRun {
                            reason: format!("cannot create {}: {e}", path.display()),
                        },
                    );
                }
            }
        }

        log::debug!("running `{}` in {}", step.command_line(), step.dir.display());

        let result = if self.capture {
            cmd.output().map(|out| {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                (out.status, text)
            })
        } else {
            cmd.status().map(|status| (status, String::new()))
        };

        match result {
            Ok((status, output)) if status.success() => {
                StepOutcome::new(step, StepStatus::Succeeded).with_output(output)
            }
            Ok((status, output)) => {
                if self.capture && !output.is_empty() {
                    eprintln!("--- output of `{}` ---", step.command_line());
                    eprint!("{output}");
                }
                StepOutcome::new(step, StepStatus::Failed { code: status.code() }).with_output(output)
            }
            Err(e) => StepOutcome::new(
                step,
                StepStatus::NotRun {
                    reason: format!("failed to spawn {}: {e}", step.program),
                },
            ),
        }
    }
}

/// Relative programs with a path separator (`./configure`, `bin/ultest`) live
/// in the step directory; bare names go through PATH.
fn program_path(dir: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        dir.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Test double that records steps instead of running them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub steps: Vec<Step>,
    /// Steps with these labels report `Failed { code: Some(2) }`.
    pub failing: Vec<String>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn failing(labels: &[&str]) -> Self {
        Self {
            steps: Vec::new(),
            failing: labels.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn commands(&self) -> Vec<(String, String)> {
        self.steps
            .iter()
            .map(|s| (s.dir.display().to_string(), s.command_line()))
            .collect()
    }
}

#[cfg(test)]
impl Runner for RecordingRunner {
    fn run(&mut self, step: &Step) -> StepOutcome {
        self.steps.push(step.clone());
        let status = if self.failing.contains(&step.label) {
            StepStatus::Failed { code: Some(2) }
        } else {
            StepStatus::Succeeded
        };
        StepOutcome::new(step, status)
    }
}
