use super::{run_step, Context};
use crate::runner::Runner;
use crate::summary::Summary;

/// Build every library in plan order.
///
/// A failing library does not stop the ones after it; the summary carries
/// every outcome.
pub fn build_all(ctx: &Context, runner: &mut dyn Runner) -> Summary {
    let mut summary = Summary::default();
    let ulapi_at = ctx.plan.ulapi.enabled.then(|| ctx.plan.ulapi_position());

    for (index, unit) in ctx.plan.units.iter().enumerate() {
        if ulapi_at == Some(index) {
            super::ulapi::bootstrap(ctx, runner, &mut summary);
        }
        run_step(runner, &ctx.unit_step(unit, &[]), &mut summary);
    }
    if ulapi_at == Some(ctx.plan.units.len()) {
        super::ulapi::bootstrap(ctx, runner, &mut summary);
    }

    summary
}

/// `make all` at the repository root, then `make <target>` for each target.
pub fn build_selected(ctx: &Context, targets: &[String], runner: &mut dyn Runner) -> Summary {
    let mut summary = Summary::default();

    run_step(runner, &ctx.make_step("all", ctx.root.clone(), &["all"]), &mut summary);
    for target in targets {
        run_step(
            runner,
            &ctx.make_step(target, ctx.root.clone(), &[target.as_str()]),
            &mut summary,
        );
    }

    summary
}
