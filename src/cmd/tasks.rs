//! Task commands (`plancraft tasks`).
//!
//! `add` runs the assignment flow (auto-pick and capacity confirmation) and
//! `move` performs the optimistic two-phase status change.

use anyhow::{Context, Result};
use console::style;

use plancraft::assign::{AssignRequest, plan_assignment};
use plancraft::board::{Board, sync_status_change};
use plancraft::models::{NewTask, Priority, TaskStatus};
use plancraft::ui::icons::BOLT;
use plancraft::ui::render::print_board;
use plancraft::ui::{print_success, print_warning, spinner};

use super::super::TasksCommands;
use super::AppContext;

pub async fn cmd_tasks(ctx: &AppContext, command: TasksCommands) -> Result<()> {
    match command {
        TasksCommands::Board { project_id } => cmd_board(ctx, &project_id).await,
        TasksCommands::Add {
            project_id,
            title,
            description,
            priority,
            status,
            assign,
            auto,
        } => {
            let request = if auto { AssignRequest::Auto } else { assign };
            cmd_add(
                ctx,
                &project_id,
                title,
                description,
                priority,
                status,
                &request,
            )
            .await
        }
        TasksCommands::Move {
            task_id,
            status,
            project,
        } => cmd_move(ctx, &project, &task_id, status).await,
        TasksCommands::Delete { task_id, project } => cmd_delete(ctx, &project, &task_id).await,
    }
}

async fn cmd_board(ctx: &AppContext, project_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let pb = spinner("Loading board...");
    let loaded = client.project_with_tasks(project_id).await;
    pb.finish_and_clear();
    let (project, tasks) = loaded.context("Project not found")?;
    print_board(&project, &Board::new(tasks));
    Ok(())
}

async fn cmd_add(
    ctx: &AppContext,
    project_id: &str,
    title: String,
    description: String,
    priority: Priority,
    status: TaskStatus,
    assign: &AssignRequest,
) -> Result<()> {
    let session = ctx.session()?;
    let client = ctx.client()?;

    let pb = spinner("Loading project...");
    let loaded = client.project_with_tasks(project_id).await;
    pb.finish_and_clear();
    let (project, tasks) = loaded.context("Project not found")?;

    let plan = plan_assignment(&ctx.balancer(), project.members(), &tasks, assign)?;

    if plan.auto_selected {
        println!(
            "{}Auto-Selected {} (Load: {})",
            BOLT,
            style(plan.assignee.as_str()).bold(),
            plan.load
        );
    }

    if let Some(warning) = &plan.warning
        && !ctx.gate().over_capacity(warning)?.is_approved()
    {
        println!("Task not created.");
        return Ok(());
    }

    client
        .create_task(&NewTask {
            title: title.clone(),
            description,
            priority,
            status,
            assigned_to: plan.assignee.clone(),
            project_id: project.id.clone(),
            email: session.email,
        })
        .await
        .context("Failed to add task")?;

    print_success(&format!("Task Added: {} -> {}", title, plan.assignee));
    Ok(())
}

async fn cmd_move(
    ctx: &AppContext,
    project_id: &str,
    task_id: &str,
    status: TaskStatus,
) -> Result<()> {
    let client = ctx.client()?;
    let (project, tasks) = client
        .project_with_tasks(project_id)
        .await
        .context("Project not found")?;

    let mut board = Board::new(tasks);
    let Some(task) = board.get(task_id) else {
        anyhow::bail!("Task {} is not on project {}", task_id, project.title);
    };
    let title = task.title.clone();

    match sync_status_change(&client, &mut board, task_id, status).await {
        Ok(true) => print_success(&format!("Moved '{}' to {}", title, status)),
        Ok(false) => println!("'{}' is already in {}", title, status),
        Err(e) => {
            print_warning(&format!("Move failed, change rolled back: {}", e));
            print_board(&project, &board);
            return Err(e).context("Failed to update task status");
        }
    }

    print_board(&project, &board);
    Ok(())
}

async fn cmd_delete(ctx: &AppContext, project_id: &str, task_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let (project, tasks) = client
        .project_with_tasks(project_id)
        .await
        .context("Project not found")?;

    let mut board = Board::new(tasks);
    let Some(task) = board.get(task_id) else {
        anyhow::bail!("Task {} is not on project {}", task_id, project.title);
    };

    if !ctx.gate().delete_task(&task.title)?.is_approved() {
        println!("Delete cancelled.");
        return Ok(());
    }
    client
        .delete_task(task_id)
        .await
        .context("Failed to delete")?;
    board.remove(task_id);

    print_success("Deleted! Your task has been deleted.");
    print_board(&project, &board);
    Ok(())
}
