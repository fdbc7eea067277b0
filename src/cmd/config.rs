//! Configuration view and validation commands (`plancraft config`).

use anyhow::Result;

use super::AppContext;
use super::super::ConfigCommands;

pub fn cmd_config(ctx: &AppContext, command: Option<ConfigCommands>) -> Result<()> {
    use plancraft::config::PlanCraftToml;

    let config_path = &ctx.config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("PlanCraft Configuration");
            println!("=======================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                ctx.config.toml.clone()
            } else {
                println!("No plancraft.toml found at {}", config_path.display());
                println!("Using default configuration:");
                PlanCraftToml::default()
            };
            println!();

            println!("[api]");
            println!("  base_url = \"{}\"", toml.api.base_url);
            println!("  timeout_secs = {}", toml.api.timeout_secs);
            println!();
            println!("[workload]");
            println!("  tie_break = \"{}\"", toml.workload.tie_break);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", ctx.config.base_url());
            println!("  tie_break = \"{}\"", ctx.config.tie_break());
            println!("  session file = {}", ctx.config.session_path.display());
            println!();

            if !config_path.exists() {
                println!("Run 'plancraft config init' to create a plancraft.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No plancraft.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = PlanCraftToml::load(config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("plancraft.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            PlanCraftToml::default().save(config_path)?;

            println!("Created plancraft.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs");
            println!("  - [workload] tie_break (input-order or name)");
            println!();
        }
    }

    Ok(())
}
