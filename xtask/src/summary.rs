//! Aggregated results of one run.

use crate::runner::{StepOutcome, StepStatus};
use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Default)]
pub struct Summary {
    pub steps: Vec<StepOutcome>,
}

impl Summary {
    pub fn push(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when nothing ran or every step succeeded.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(StepOutcome::succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.succeeded())
    }

    pub fn print(&self) {
        println!();
        for step in &self.steps {
            match &step.status {
                StepStatus::Succeeded => println!("  [ok]   {}", step.label),
                StepStatus::Failed { .. } if step.command.is_empty() => {
                    println!("  [FAIL] {}: {}", step.label, step.output);
                }
                StepStatus::Failed { .. } => {
                    println!("  [FAIL] {} (`{}` {})", step.label, step.command, step.status);
                }
                StepStatus::NotRun { reason } => println!("  [skip] {}: {reason}", step.label),
            }
        }
        let failed = self.failures().count();
        println!(
            "  {} of {} steps succeeded",
            self.steps.len() - failed,
            self.steps.len()
        );
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let doc = serde_json::json!({
            "succeeded": self.succeeded(),
            "steps": self.steps,
        });
        let contents = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing summary '{}'", path.display()))?;
        Ok(())
    }
}
