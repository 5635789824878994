use crate::cli::{Cli, Request, USAGE};
use crate::plan::Plan;
use crate::runner::{ProcessRunner, Runner};
use crate::summary::Summary;
use crate::tasks::Context;
use anyhow::Result;

pub fn run(cli: &Cli) -> Result<Summary> {
    let request = Request::parse(&cli.request);
    log::debug!("request: {request:?}");

    // Only actions that run steps need a root, a plan and a build tool.
    let summary = match request {
        Request::Nothing => Summary::default(),
        Request::Usage => {
            print!("{USAGE}");
            Summary::default()
        }
        action => {
            let ctx = context(cli)?;
            dispatch(&ctx, &action, &mut ProcessRunner::new(cli.capture))?
        }
    };

    if !summary.is_empty() {
        summary.print();
    }
    if let Some(path) = &cli.summary {
        summary.write_json(path)?;
    }
    Ok(summary)
}

fn context(cli: &Cli) -> Result<Context> {
    let mut plan = Plan::resolve(cli.manifest.as_deref())?;
    plan.ulapi.enabled |= cli.ulapi;
    Ok(Context {
        root: crate::util::repo::repo_root(cli.root.as_deref())?,
        plan,
        make: crate::util::repo::program(&cli.make)?,
    })
}

/// Run the steps an action asks for. `Nothing` and `Usage` run no steps.
pub fn dispatch(ctx: &Context, request: &Request, runner: &mut dyn Runner) -> Result<Summary> {
    let summary = match request {
        Request::Nothing | Request::Usage => Summary::default(),
        Request::BuildAll => {
            if ctx.plan.ulapi.enabled {
                runner.preflight(&[ctx.make.as_str(), "tar"])?;
            } else {
                runner.preflight(&[ctx.make.as_str()])?;
            }
            crate::tasks::build::build_all(ctx, runner)
        }
        Request::CleanAll => {
            runner.preflight(&[ctx.make.as_str()])?;
            crate::tasks::clean::clean_all(ctx, runner)
        }
        Request::BuildSelected(targets) => {
            runner.preflight(&[ctx.make.as_str()])?;
            crate::tasks::build::build_selected(ctx, targets, runner)
        }
    };
    Ok(summary)
}
