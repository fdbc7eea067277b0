//! Workload report for a project's team (`plancraft workload`).

use anyhow::{Context, Result};

use plancraft::ui::render::print_workload;
use plancraft::ui::spinner;

use super::AppContext;

pub async fn cmd_workload(ctx: &AppContext, project_id: &str, json: bool) -> Result<()> {
    let client = ctx.client()?;
    let pb = spinner("Loading workload...");
    let loaded = client.project_with_tasks(project_id).await;
    pb.finish_and_clear();
    let (project, tasks) = loaded.context("Project not found")?;

    let balancer = ctx.balancer();
    let report = balancer.report(project.members(), &tasks);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} ({})", project.title, project.team_name());
        println!();
        print_workload(&report, balancer.tie_break());
    }
    Ok(())
}
