use super::{run_step, Context};
use crate::runner::Runner;
use crate::summary::Summary;

/// `make clean` in every library, same order as the build.
pub fn clean_all(ctx: &Context, runner: &mut dyn Runner) -> Summary {
    let mut summary = Summary::default();
    for unit in &ctx.plan.units {
        run_step(runner, &ctx.unit_step(unit, &["clean"]), &mut summary);
    }
    summary
}
