//! Plain-terminal rendering of teams, projects, boards and workload.
//!
//! `format_*` helpers return strings so they can be tested without a terminal;
//! `print_*` helpers write them to stdout.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::board::Board;
use crate::models::{DashboardStats, Priority, Project, Task, TaskStatus, Team};
use crate::ui::icons::{
    BOLT, CHECK, CROSS, DONE, FOLDER, IN_PROGRESS, PENDING, PERSON, SPARKLE, TEAM, WARN,
};
use crate::workload::{MemberWorkload, TieBreak, WorkloadReport};

const BAR_WIDTH: usize = 20;

/// Spinner shown while a request is in flight. Hidden when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("progress bar template is a valid static string"),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_success(message: &str) {
    println!("{}{}", CHECK, style(message).green());
}

pub fn print_warning(message: &str) {
    println!("{}{}", WARN, style(message).yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{}{} {}", CROSS, style("Error:").red().bold(), message);
}

fn status_icon(status: TaskStatus) -> String {
    match status {
        TaskStatus::Pending => PENDING.to_string(),
        TaskStatus::InProgress => IN_PROGRESS.to_string(),
        TaskStatus::Done => DONE.to_string(),
    }
}

fn priority_label(priority: Priority) -> String {
    match priority {
        Priority::High => style(priority.as_str()).red().to_string(),
        Priority::Medium => style(priority.as_str()).yellow().to_string(),
        Priority::Low => style(priority.as_str()).dim().to_string(),
    }
}

/// `[#####---------------]` scaled to capacity, clamped at full.
pub fn load_bar(count: usize, capacity: u32) -> String {
    let filled = if capacity == 0 {
        BAR_WIDTH
    } else {
        ((count as f64 / capacity as f64) * BAR_WIDTH as f64).round() as usize
    }
    .min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn format_team(team: &Team) -> String {
    let mut out = format!(
        "{}{}  {}\n",
        TEAM,
        style(&team.name).bold(),
        style(format!("({})", team.id)).dim()
    );
    if team.members.is_empty() {
        out.push_str(&format!("    {}\n", style("No members yet").dim()));
    }
    for m in &team.members {
        out.push_str(&format!(
            "    {}{} - {} (Cap: {})\n",
            PERSON, m.name, m.role, m.capacity
        ));
    }
    out
}

pub fn print_teams(teams: &[Team]) {
    if teams.is_empty() {
        println!("No teams found. Create one with `plancraft teams create <name>`.");
        return;
    }
    for team in teams {
        print!("{}", format_team(team));
    }
}

pub fn format_project(project: &Project) -> String {
    let mut line = format!(
        "{}{}  {}  team: {}",
        FOLDER,
        style(&project.title).bold(),
        style(format!("({})", project.id)).dim(),
        project.team_name()
    );
    if !project.description.is_empty() {
        line.push_str(&format!("\n    {}", project.description));
    }
    line
}

pub fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found. Create one with `plancraft projects create`.");
        return;
    }
    for project in projects {
        println!("{}", format_project(project));
    }
}

fn format_task_card(task: &Task) -> String {
    format!(
        "    {}  {}  {}  {}",
        task.title,
        priority_label(task.priority),
        style(task.assigned_to.as_str()).cyan(),
        style(&task.id).dim()
    )
}

pub fn format_board(project: &Project, board: &Board) -> String {
    let mut out = format!(
        "{}{}  Assigned Team: {}\n",
        FOLDER,
        style(&project.title).bold(),
        project.team_name()
    );
    for column in board.columns() {
        out.push_str(&format!(
            "\n{}{} ({})\n",
            status_icon(column.status),
            style(column.status.as_str()).bold(),
            column.count()
        ));
        if column.tasks.is_empty() {
            out.push_str(&format!("    {}\n", style("-").dim()));
        }
        for task in column.tasks {
            out.push_str(&format_task_card(task));
            out.push('\n');
        }
    }
    out
}

pub fn print_board(project: &Project, board: &Board) {
    print!("{}", format_board(project, board));
}

pub fn format_workload(report: &WorkloadReport, tie_break: TieBreak) -> String {
    let mut out = String::new();
    if report.members.is_empty() {
        out.push_str("This project's team has no members.\n");
        return out;
    }
    for m in &report.members {
        let flag = if m.over_capacity {
            style("At capacity").red().to_string()
        } else {
            style("Available").green().to_string()
        };
        out.push_str(&format!(
            "{}{:<16} {} {}/{}  {}\n",
            PERSON,
            m.name,
            load_bar(m.load, m.capacity),
            m.load,
            m.capacity,
            flag
        ));
    }
    if let Some(pick) = &report.recommended {
        let load = report.load_by_member.get(&pick.name).copied().unwrap_or(0);
        out.push_str(&format!(
            "\n{}Recommended: {} (Load: {})  {}\n",
            BOLT,
            style(&pick.name).bold(),
            load,
            style(format!("tie-break: {}", tie_break)).dim()
        ));
    }
    out
}

pub fn print_workload(report: &WorkloadReport, tie_break: TieBreak) {
    print!("{}", format_workload(report, tie_break));
}

pub fn format_dashboard(stats: &DashboardStats, workload: &[MemberWorkload]) -> String {
    let mut out = format!(
        "{}Projects: {}   Tasks: {}\n\nTeam Workload\n",
        SPARKLE,
        style(stats.total_projects).bold(),
        style(stats.total_tasks).bold()
    );
    if workload.is_empty() {
        out.push_str(&format!("    {}\n", style("No team members yet").dim()));
    }
    for row in workload {
        let badge = if row.overloaded() {
            style("Overloaded").red().to_string()
        } else {
            style("Available").green().to_string()
        };
        out.push_str(&format!(
            "    {:<16} Load: {} / {} Tasks  {:>4}%  {}\n",
            row.name,
            row.count,
            row.capacity,
            row.utilization_percent(),
            badge
        ));
    }

    out.push_str("\nRecent Activity\n");
    if stats.logs.is_empty() {
        out.push_str(&format!("    {}\n", style("No recent logs.").dim()));
    }
    for log in &stats.logs {
        let day = log
            .day()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("    {}  {}\n", style(day).dim(), log.text()));
    }
    out
}

pub fn print_dashboard(stats: &DashboardStats, workload: &[MemberWorkload]) {
    print!("{}", format_dashboard(stats, workload));
}
