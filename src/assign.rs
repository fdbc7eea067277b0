//! Assignee resolution for new tasks.
//!
//! The outcome of [`plan_assignment`] may carry a [`CapacityWarning`]. The
//! task can still be created with it, but only after the user confirms.

use std::fmt;
use std::str::FromStr;

use crate::errors::AssignError;
use crate::models::{Assignee, Member, Task, UNASSIGNED};
use crate::workload::{WorkloadBalancer, check_capacity, compute_load};

/// What the user asked for when creating a task.
///
/// Parsing never yields `Auto`: a name is always taken literally, so a member
/// called "auto" stays assignable. Auto-pick is requested separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignRequest {
    /// Let the balancer pick the least-loaded member.
    Auto,
    Unassigned,
    Member(String),
}

impl FromStr for AssignRequest {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNASSIGNED) {
            Self::Unassigned
        } else {
            Self::Member(trimmed.to_string())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityWarning {
    pub member: String,
    pub load: usize,
    pub capacity: u32,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is at capacity ({}/{}).",
            self.member, self.load, self.capacity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub assignee: Assignee,
    /// Open tasks the assignee already carries (0 when unassigned).
    pub load: usize,
    pub auto_selected: bool,
    pub warning: Option<CapacityWarning>,
}

pub fn plan_assignment(
    balancer: &WorkloadBalancer,
    members: &[Member],
    tasks: &[Task],
    request: &AssignRequest,
) -> Result<AssignmentPlan, AssignError> {
    let (member, auto_selected) = match request {
        AssignRequest::Unassigned => {
            return Ok(AssignmentPlan {
                assignee: Assignee::Unassigned,
                load: 0,
                auto_selected: false,
                warning: None,
            });
        }
        AssignRequest::Auto => (
            balancer
                .recommend_assignee(members, tasks)
                .ok_or(AssignError::EmptyTeam)?,
            true,
        ),
        AssignRequest::Member(name) => (
            members
                .iter()
                .find(|m| &m.name == name)
                .ok_or_else(|| AssignError::UnknownMember { name: name.clone() })?,
            false,
        ),
    };

    let load = compute_load(tasks, &member.name);
    let warning = check_capacity(member, tasks).then(|| CapacityWarning {
        member: member.name.clone(),
        load,
        capacity: member.capacity,
    });

    Ok(AssignmentPlan {
        assignee: Assignee::Member(member.name.clone()),
        load,
        auto_selected,
        warning,
    })
}
