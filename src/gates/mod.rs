use anyhow::Result;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::assign::CapacityWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Approved,
    /// Approved without asking because of `--yes`.
    AutoApproved,
    Declined,
}

impl GateDecision {
    pub fn is_approved(&self) -> bool {
        !matches!(self, GateDecision::Declined)
    }
}

/// Interactive confirmations for actions the user must explicitly accept.
pub struct ConfirmGate {
    pub skip_all: bool,
}

impl ConfirmGate {
    pub fn new(skip_all: bool) -> Self {
        Self { skip_all }
    }

    /// Assigning past capacity is allowed, but only on explicit confirmation.
    pub fn over_capacity(&self, warning: &CapacityWarning) -> Result<GateDecision> {
        println!(
            "  {} {}",
            console::style("Over Capacity:").yellow().bold(),
            warning
        );
        self.ask("Assign anyway?", false)
    }

    /// Confirm deleting the task shown as `title`.
    pub fn delete_task(&self, title: &str) -> Result<GateDecision> {
        self.ask(
            &format!("Delete task '{}'? You won't be able to revert this!", title),
            false,
        )
    }

    pub fn rebalance(&self) -> Result<GateDecision> {
        self.ask("Rebalance team workload?", true)
    }

    fn ask(&self, prompt: &str, default: bool) -> Result<GateDecision> {
        if self.skip_all {
            println!(
                "  {} {} (--yes flag)",
                prompt,
                console::style("Auto-approved").dim()
            );
            return Ok(GateDecision::AutoApproved);
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()?;

        Ok(if confirmed {
            GateDecision::Approved
        } else {
            GateDecision::Declined
        })
    }
}
