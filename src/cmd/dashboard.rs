//! Dashboard commands (`plancraft dashboard`).

use anyhow::{Context, Result};

use plancraft::client::ApiClient;
use plancraft::ui::render::print_dashboard;
use plancraft::ui::{print_success, spinner};
use plancraft::workload::merge_dashboard_workload;

use super::super::DashboardCommands;
use super::AppContext;

pub async fn cmd_dashboard(ctx: &AppContext, command: Option<DashboardCommands>) -> Result<()> {
    let session = ctx.session()?;
    let client = ctx.client()?;

    match command {
        None | Some(DashboardCommands::Stats) => show(&client, &session.email).await,
        Some(DashboardCommands::Rebalance) => {
            if !ctx.gate().rebalance()?.is_approved() {
                println!("Rebalance cancelled.");
                return Ok(());
            }
            let pb = spinner("Rebalancing...");
            let result = client.rebalance(&session.email).await;
            pb.finish_and_clear();
            let result = result.context("Failed to rebalance workload")?;
            print_success(if result.message.is_empty() {
                "Workload rebalanced"
            } else {
                &result.message
            });
            println!();
            show(&client, &session.email).await
        }
    }
}

async fn show(client: &ApiClient, email: &str) -> Result<()> {
    let pb = spinner("Loading dashboard...");
    let loaded = client.dashboard(email).await;
    pb.finish_and_clear();
    let (stats, teams) = loaded.context("Failed to load dashboard")?;
    let workload = merge_dashboard_workload(&teams, &stats);
    print_dashboard(&stats, &workload);
    Ok(())
}
