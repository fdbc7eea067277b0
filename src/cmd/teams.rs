//! Team management commands (`plancraft teams`).

use anyhow::{Context, Result};

use plancraft::models::{Member, NewTeam};
use plancraft::ui::render::print_teams;
use plancraft::ui::{print_success, spinner};

use super::super::TeamsCommands;
use super::AppContext;

pub async fn cmd_teams(ctx: &AppContext, command: Option<TeamsCommands>) -> Result<()> {
    let session = ctx.session()?;
    let client = ctx.client()?;

    match command {
        None | Some(TeamsCommands::List) => {
            let pb = spinner("Loading teams...");
            let teams = client.list_teams(&session.email).await;
            pb.finish_and_clear();
            print_teams(&teams.context("Failed to load teams")?);
        }
        Some(TeamsCommands::Create { name }) => {
            client
                .create_team(&NewTeam {
                    name: name.clone(),
                    email: session.email.clone(),
                })
                .await
                .context("Failed to create team")?;
            print_success(&format!("Team created: {}", name));
        }
        Some(TeamsCommands::AddMember {
            team_id,
            name,
            role,
            capacity,
        }) => {
            let member = Member::new(name, role, capacity);
            client
                .add_member(&team_id, &member)
                .await
                .context("Failed to add member")?;
            print_success(&format!(
                "Member added: {} ({}, capacity {})",
                member.name, member.role, member.capacity
            ));
        }
    }

    Ok(())
}
