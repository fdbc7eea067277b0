//! Sign-in lifecycle commands: `login`, `logout` and `whoami`.

use anyhow::Result;
use console::style;
use tracing::warn;

use plancraft::models::NewUser;
use plancraft::session::Session;
use plancraft::ui::{print_success, print_warning, spinner};

use super::AppContext;

pub async fn cmd_login(ctx: &AppContext, email: &str, name: Option<&str>) -> Result<()> {
    let session = Session::new(email, name)?;
    let client = ctx.client()?;

    // The server-side user record is best effort; a failed sync doesn't block sign-in.
    let pb = spinner("Syncing user...");
    let synced = client
        .sync_user(&NewUser {
            name: session.name.clone(),
            email: session.email.clone(),
        })
        .await;
    pb.finish_and_clear();
    match synced {
        Ok(created) if created.user_synced() => {}
        Ok(created) => warn!(response = ?created.message, "unexpected user sync response"),
        Err(e) => {
            warn!(error = %e, "user sync failed");
            print_warning("User sync skipped: API unreachable or rejected the request.");
        }
    }

    ctx.sessions().save(&session)?;
    print_success(&format!("Welcome back, {}! Login successful.", session.name));
    Ok(())
}

pub fn cmd_logout(ctx: &AppContext) -> Result<()> {
    if ctx.sessions().clear()? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.session()?;
    println!(
        "{} <{}>  {}",
        style(&session.name).bold(),
        session.email,
        style(format!(
            "since {}",
            session.logged_in_at.format("%Y-%m-%d %H:%M UTC")
        ))
        .dim()
    );
    Ok(())
}
