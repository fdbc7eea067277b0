use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Assignee value meaning no member is responsible for a task.
pub const UNASSIGNED: &str = "Unassigned";

/// Capacity used when a member record carries none (or a non-positive one).
///
/// Applied at deserialization, so it holds for the creation-time capacity
/// check as well as the dashboard. A member without a stored capacity
/// therefore triggers the over-capacity confirmation once five open tasks
/// are assigned to them.
pub const DEFAULT_CAPACITY: u32 = 5;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Member forms post capacity as a string, so accept both numbers and numeric strings.
fn lenient_capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => n,
        Some(Raw::Float(f)) => f as i64,
        Some(Raw::Text(s)) => s.trim().parse::<i64>().unwrap_or(0),
        None => 0,
    };
    Ok(if parsed > 0 {
        u32::try_from(parsed).unwrap_or(u32::MAX)
    } else {
        DEFAULT_CAPACITY
    })
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Done,
}

impl TaskStatus {
    /// Board columns, left to right.
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(format!(
                "Invalid status: {} (expected pending, in-progress or done)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Who a task is assigned to. On the wire this is a plain member name,
/// with the `"Unassigned"` sentinel for nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignee {
    #[default]
    Unassigned,
    Member(String),
}

impl Assignee {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unassigned => UNASSIGNED,
            Self::Member(name) => name,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }
}

impl From<String> for Assignee {
    fn from(value: String) -> Self {
        if value.is_empty() || value == UNASSIGNED {
            Self::Unassigned
        } else {
            Self::Member(value)
        }
    }
}

impl From<&str> for Assignee {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Assignee> for String {
    fn from(value: Assignee) -> Self {
        match value {
            Assignee::Unassigned => UNASSIGNED.to_string(),
            Assignee::Member(name) => name,
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default = "default_capacity", deserialize_with = "lenient_capacity")]
    pub capacity: u32,
}

impl Member {
    pub fn new(name: impl Into<String>, role: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<Member>,
}

/// A project's team is populated on the detail endpoint and may be a bare id elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TeamRef {
    Team(Team),
    Id(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub team: Option<TeamRef>,
}

impl Project {
    pub fn team(&self) -> Option<&Team> {
        match &self.team {
            Some(TeamRef::Team(team)) => Some(team),
            _ => None,
        }
    }

    pub fn team_name(&self) -> &str {
        match &self.team {
            Some(TeamRef::Team(team)) => &team.name,
            Some(TeamRef::Id(id)) => id,
            None => "-",
        }
    }

    /// Members of the populated team, or nothing when only an id is known.
    pub fn members(&self) -> &[Member] {
        self.team().map(|t| t.members.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_to: Assignee,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            assigned_to: Assignee::Unassigned,
            project_id: None,
        }
    }

    pub fn assigned(mut self, assignee: impl Into<Assignee>) -> Self {
        self.assigned_to = assignee.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

// Request payloads

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTeam {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(rename = "teamId")]
    pub team_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: Assignee,
    pub project_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

// Response payloads

/// Acknowledgement returned by the create endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    #[serde(default)]
    pub inserted_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Created {
    /// A user sync counts as done when the record was inserted or already existed.
    pub fn user_synced(&self) -> bool {
        self.inserted_id.is_some() || self.message.as_deref() == Some("User exists")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RebalanceResult {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub task_count: Option<usize>,
}

impl WorkloadEntry {
    pub fn key(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.id.as_deref())
    }

    pub fn open_tasks(&self) -> usize {
        self.count
            .filter(|c| *c > 0)
            .or(self.task_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityLog {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ActivityLog {
    pub fn text(&self) -> &str {
        self.message
            .as_deref()
            .or(self.action.as_deref())
            .unwrap_or("")
    }

    /// Calendar date of the entry, if the timestamp parses as RFC 3339.
    pub fn day(&self) -> Option<chrono::NaiveDate> {
        let raw = self.timestamp.as_deref().or(self.date.as_deref())?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_projects: usize,
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workload: Vec<WorkloadEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<ActivityLog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_deserializes_wire_names() {
        let task: Task = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Write docs",
            "description": "All of them",
            "priority": "High",
            "status": "In Progress",
            "assignedTo": "Alice",
            "projectId": "p1"
        }))
        .unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assigned_to, Assignee::Member("Alice".into()));
        assert_eq!(task.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn task_missing_fields_use_defaults() {
        let task: Task = serde_json::from_value(json!({"_id": "t2", "title": "x"})).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.assigned_to.is_unassigned());
        assert!(task.description.is_empty());
    }

    #[test]
    fn task_null_description_is_empty() {
        let task: Task =
            serde_json::from_value(json!({"_id": "t3", "title": "x", "description": null}))
                .unwrap();
        assert_eq!(task.description, "");
    }

    #[test]
    fn unassigned_sentinel_round_trips_as_string() {
        let task = Task::new("t1", "x");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["assignedTo"], "Unassigned");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["_id"], "t1");
    }

    #[test]
    fn status_from_str_accepts_cli_spellings() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("DONE".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn member_capacity_accepts_strings_and_falls_back() {
        let m: Member =
            serde_json::from_value(json!({"name": "A", "role": "dev", "capacity": "3"})).unwrap();
        assert_eq!(m.capacity, 3);
        let m: Member = serde_json::from_value(json!({"name": "B"})).unwrap();
        assert_eq!(m.capacity, DEFAULT_CAPACITY);
        let m: Member = serde_json::from_value(json!({"name": "C", "capacity": 0})).unwrap();
        assert_eq!(m.capacity, DEFAULT_CAPACITY);
        let m: Member = serde_json::from_value(json!({"name": "D", "capacity": "lots"})).unwrap();
        assert_eq!(m.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn project_team_may_be_populated_or_id() {
        let populated: Project = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Site",
            "team": {"_id": "t1", "name": "Core", "members": [{"name": "A", "role": "dev", "capacity": 2}]}
        }))
        .unwrap();
        assert_eq!(populated.team_name(), "Core");
        assert_eq!(populated.members().len(), 1);

        let bare: Project =
            serde_json::from_value(json!({"_id": "p2", "title": "Api", "team": "t1"})).unwrap();
        assert_eq!(bare.team_name(), "t1");
        assert!(bare.members().is_empty());
    }

    #[test]
    fn workload_entry_key_and_count_fallbacks() {
        let by_id: WorkloadEntry =
            serde_json::from_value(json!({"_id": "Bob", "taskCount": 4})).unwrap();
        assert_eq!(by_id.key(), Some("Bob"));
        assert_eq!(by_id.open_tasks(), 4);

        let empty: WorkloadEntry = serde_json::from_value(json!({"name": "Eve"})).unwrap();
        assert_eq!(empty.open_tasks(), 0);
    }

    #[test]
    fn new_task_payload_uses_camel_case() {
        let payload = NewTask {
            title: "x".into(),
            description: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            assigned_to: Assignee::Member("Alice".into()),
            project_id: "p1".into(),
            email: "a@b.c".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["assignedTo"], "Alice");
        assert_eq!(value["projectId"], "p1");
        assert_eq!(value["priority"], "Medium");
    }

    #[test]
    fn activity_log_text_and_day() {
        let log: ActivityLog = serde_json::from_value(
            json!({"action": "Task moved", "date": "2026-03-04T10:00:00Z"}),
        )
        .unwrap();
        assert_eq!(log.text(), "Task moved");
        assert_eq!(
            log.day(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 4)
        );
    }
}
