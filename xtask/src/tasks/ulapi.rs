//! ULAPI bootstrap: unpack the bundled tarball, configure, build, install,
//! then check the self-test output against the known-good log.

use super::{run_step, Context};
use crate::compare;
use crate::runner::{Runner, Step, StepOutcome, StepStatus};
use crate::summary::Summary;

const CHECK: &str = "ulapi self-test log";

pub fn bootstrap(ctx: &Context, runner: &mut dyn Runner, summary: &mut Summary) {
    let layout = &ctx.plan.ulapi;
    let base = ctx.root.join(&layout.dir);
    let src = base.join(&layout.source_dir);
    let prefix = format!("prefix={}", layout.prefix);

    let steps = [
        Step::new("ulapi unpack", base.clone(), "tar").args(["xzvf", layout.archive.as_str()]),
        Step::new("ulapi configure", src.clone(), "./configure"),
        ctx.make_step("ulapi build", src.clone(), &[]),
        ctx.make_step("ulapi install", src.clone(), &["install", prefix.as_str()]),
        Step::new("ulapi self-test", src.clone(), layout.self_test.as_str())
            .stdout_to(layout.log_file.as_str()),
    ];
    for step in &steps {
        run_step(runner, step, summary);
    }

    println!("{CHECK}");

    // A self-test that never ran can leave an empty log behind, which would compare clean.
    if !summary.steps.last().is_some_and(StepOutcome::succeeded) {
        summary.push(StepOutcome::check(
            CHECK,
            base,
            StepStatus::NotRun {
                reason: "self-test did not succeed".to_string(),
            },
        ));
        return;
    }

    let actual = src.join(&layout.log_file);
    let expected = base.join(&layout.expected_log);
    let report = base.join(&layout.report_file);
    let outcome = match compare::compare(&actual, &expected, &report) {
        Ok(result) if result.identical() => StepOutcome::check(CHECK, base, StepStatus::Succeeded),
        Ok(result) => {
            println!("Something may have gone wrong with ULAPI, please refer to ULAPI's documentation");
            println!("A log of where the tests differ is in {}", report.display());
            StepOutcome::check(CHECK, base, StepStatus::Failed { code: None }).with_output(format!(
                "{} self-test lines differ, see {}",
                result.mismatches.len(),
                report.display()
            ))
        }
        Err(e) => {
            log::warn!("ULAPI self-test log could not be checked: {e}");
            StepOutcome::check(CHECK, base, StepStatus::Failed { code: None }).with_output(e.to_string())
        }
    };
    summary.push(outcome);
}
