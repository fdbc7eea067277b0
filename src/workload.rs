//! Workload balancing over a team's members and a project's tasks.
//!
//! A member's *load* is the number of tasks assigned to them that are not
//! `Done`. It is always derived from the task list passed in and never cached,
//! so every call reflects the caller's current view of the board.
//!
//! There are two capacity comparisons:
//! - [`check_capacity`] is inclusive (`load >= capacity`) and gates task creation.
//! - [`MemberWorkload::overloaded`] is strict (`count > capacity`) and is the
//!   dashboard badge.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{DashboardStats, Member, Task, Team, UNASSIGNED};

/// How `recommend_assignee` chooses between members with equal load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// First member in team order wins.
    #[default]
    InputOrder,
    /// Lexicographically smallest name wins.
    Name,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::InputOrder => write!(f, "input-order"),
            TieBreak::Name => write!(f, "name"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input-order" | "input_order" | "order" => Ok(TieBreak::InputOrder),
            "name" => Ok(TieBreak::Name),
            _ => anyhow::bail!(
                "Invalid tie-break '{}'. Valid values: input-order, name",
                s
            ),
        }
    }
}

/// Number of open (non-`Done`) tasks assigned to `member_name`.
pub fn compute_load(tasks: &[Task], member_name: &str) -> usize {
    tasks
        .iter()
        .filter(|t| t.assigned_to.as_str() == member_name && t.status.is_open())
        .count()
}

/// Whether assigning one more task to `member` would meet or exceed their capacity.
///
/// Advisory only. Never true for the `Unassigned` sentinel.
pub fn check_capacity(member: &Member, tasks: &[Task]) -> bool {
    if member.name == UNASSIGNED {
        return false;
    }
    compute_load(tasks, &member.name) >= member.capacity as usize
}

/// Load of a single member at report time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoad {
    pub name: String,
    pub role: String,
    pub load: usize,
    pub capacity: u32,
    pub over_capacity: bool,
}

/// Snapshot of a team's workload against a task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub load_by_member: BTreeMap<String, usize>,
    pub recommended: Option<Member>,
    pub over_capacity: bool,
    /// Per-member detail in team order.
    pub members: Vec<MemberLoad>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadBalancer {
    tie_break: TieBreak,
}

impl WorkloadBalancer {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Least-loaded member, or `None` for an empty team.
    ///
    /// This is a point-in-time pick: nothing is reserved, so another
    /// assignment can change the answer before the caller acts on it.
    pub fn recommend_assignee<'a>(&self, members: &'a [Member], tasks: &[Task]) -> Option<&'a Member> {
        let loads = members.iter().map(|m| (m, compute_load(tasks, &m.name)));
        match self.tie_break {
            TieBreak::InputOrder => loads
                .reduce(|best, next| if next.1 < best.1 { next } else { best })
                .map(|(m, _)| m),
            TieBreak::Name => loads
                .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.name.cmp(&b.0.name)))
                .map(|(m, _)| m),
        }
    }

    pub fn report(&self, members: &[Member], tasks: &[Task]) -> WorkloadReport {
        let details: Vec<MemberLoad> = members
            .iter()
            .map(|m| MemberLoad {
                name: m.name.clone(),
                role: m.role.clone(),
                load: compute_load(tasks, &m.name),
                capacity: m.capacity,
                over_capacity: check_capacity(m, tasks),
            })
            .collect();

        WorkloadReport {
            load_by_member: details.iter().map(|d| (d.name.clone(), d.load)).collect(),
            recommended: self.recommend_assignee(members, tasks).cloned(),
            over_capacity: details.iter().any(|d| d.over_capacity),
            members: details,
        }
    }
}

/// A member row on the dashboard: team data joined with the server's open-task count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberWorkload {
    pub name: String,
    pub role: String,
    pub capacity: u32,
    pub count: usize,
}

impl MemberWorkload {
    pub fn overloaded(&self) -> bool {
        self.count > self.capacity as usize
    }

    pub fn utilization_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 0;
        }
        (self.count as f64 / self.capacity as f64 * 100.0).round() as u32
    }
}

/// Join every member of every team with the stats' per-member counts.
///
/// Members missing from the stats count as zero. Duplicate names collapse to
/// one row that keeps the first row's position and the last row's data.
pub fn merge_dashboard_workload(teams: &[Team], stats: &DashboardStats) -> Vec<MemberWorkload> {
    let counts: HashMap<&str, usize> = stats
        .workload
        .iter()
        .filter_map(|entry| entry.key().map(|k| (k, entry.open_tasks())))
        .collect();

    let mut rows: Vec<MemberWorkload> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for member in teams.iter().flat_map(|t| t.members.iter()) {
        let row = MemberWorkload {
            name: member.name.clone(),
            role: member.role.clone(),
            capacity: member.capacity,
            count: counts.get(member.name.as_str()).copied().unwrap_or(0),
        };
        match index_by_name.get(&member.name) {
            Some(&idx) => rows[idx] = row,
            None => {
                index_by_name.insert(member.name.clone(), rows.len());
                rows.push(row);
            }
        }
    }

    rows
}
