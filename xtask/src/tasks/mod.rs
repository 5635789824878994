pub mod build;
pub mod clean;
pub mod ulapi;

use crate::plan::{Plan, Unit};
use crate::runner::{Runner, Step};
use crate::summary::Summary;
use std::path::PathBuf;

/// Everything a task needs to turn plan entries into steps.
#[derive(Debug)]
pub struct Context {
    /// Absolute; every step directory is joined onto it.
    pub root: PathBuf,
    pub plan: Plan,
    pub make: String,
}

impl Context {
    fn make_step(&self, label: &str, dir: PathBuf, args: &[&str]) -> Step {
        Step::new(label, dir, self.make.as_str()).args(args.iter().copied())
    }

    fn unit_step(&self, unit: &Unit, args: &[&str]) -> Step {
        self.make_step(&unit.label, self.root.join(&unit.dir), args)
    }
}

/// Print the step's label, run it, and record the outcome.
fn run_step(runner: &mut dyn Runner, step: &Step, summary: &mut Summary) {
    println!("{}", step.label);
    let outcome = runner.run(step);
    if !outcome.succeeded() {
        log::warn!(
            "{}: `{}` in {} {}",
            outcome.label,
            outcome.command,
            outcome.dir.display(),
            outcome.status
        );
    }
    summary.push(outcome);
}
