//! Project commands (`plancraft projects`).

use anyhow::{Context, Result};

use plancraft::board::Board;
use plancraft::models::NewProject;
use plancraft::ui::render::{format_project, format_team, print_board, print_projects};
use plancraft::ui::{print_success, spinner};

use super::super::ProjectsCommands;
use super::AppContext;

pub async fn cmd_projects(ctx: &AppContext, command: Option<ProjectsCommands>) -> Result<()> {
    let client = ctx.client()?;

    match command {
        None | Some(ProjectsCommands::List) => {
            let session = ctx.session()?;
            let pb = spinner("Loading projects...");
            let projects = client.list_projects(&session.email).await;
            pb.finish_and_clear();
            print_projects(&projects.context("Failed to load projects")?);
        }
        Some(ProjectsCommands::Create {
            title,
            team_id,
            description,
        }) => {
            let session = ctx.session()?;
            client
                .create_project(&NewProject {
                    title: title.clone(),
                    description,
                    team_id,
                    email: session.email,
                })
                .await
                .context("Creation failed. Please try again.")?;
            print_success(&format!("Project Created: {}", title));
        }
        Some(ProjectsCommands::Show { id }) => {
            let pb = spinner("Loading project...");
            let loaded = client.project_with_tasks(&id).await;
            pb.finish_and_clear();
            let (project, tasks) = loaded.context("Project not found")?;

            println!("{}", format_project(&project));
            if let Some(team) = project.team() {
                print!("{}", format_team(team));
            }
            println!();
            print_board(&project, &Board::new(tasks));
        }
    }

    Ok(())
}
