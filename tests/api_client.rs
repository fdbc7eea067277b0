//! API client tests against an in-process mock of the PlanCraft server.
//!
//! The mock keeps its tasks in memory so status moves, creates and deletes
//! can be checked from both sides of the wire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

use plancraft::board::{Board, sync_status_change};
use plancraft::client::ApiClient;
use plancraft::models::{Assignee, NewTask, NewUser, Priority, TaskStatus};
use plancraft::workload::{TieBreak, WorkloadBalancer, merge_dashboard_workload};

const EMAIL: &str = "owner@example.com";

#[derive(Default)]
struct MockState {
    tasks: Vec<Value>,
    fail_updates: bool,
    next_id: usize,
    seen_emails: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

fn team() -> Value {
    json!({
        "_id": "team-1",
        "name": "Core",
        "members": [
            { "name": "Alice", "role": "Dev", "capacity": 2 },
            { "name": "Bob", "role": "QA", "capacity": "3" }
        ]
    })
}

fn seed_tasks() -> Vec<Value> {
    vec![
        json!({ "_id": "t1", "title": "Schema", "priority": "High", "status": "In Progress", "assignedTo": "Alice", "projectId": "p1" }),
        json!({ "_id": "t2", "title": "Login page", "priority": "Medium", "status": "Pending", "assignedTo": "Alice", "projectId": "p1" }),
        json!({ "_id": "t3", "title": "Kickoff", "priority": "Low", "status": "Done", "assignedTo": "Alice", "projectId": "p1" }),
        json!({ "_id": "t4", "title": "Test plan", "priority": "Low", "status": "Pending", "assignedTo": "Bob", "projectId": "p1" }),
        json!({ "_id": "t5", "title": "Backlog item", "status": "Pending", "assignedTo": "Unassigned", "projectId": "p1" }),
    ]
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn sync_user(Json(body): Json<Value>) -> Json<Value> {
    if body["email"] == EMAIL {
        Json(json!({ "message": "User exists" }))
    } else {
        Json(json!({ "insertedId": "u-new" }))
    }
}

async fn list_teams(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let email = query.get("email").cloned().unwrap_or_default();
    state.lock().unwrap().seen_emails.push(email.clone());
    if email == EMAIL {
        Json(json!([team()]))
    } else {
        Json(json!([]))
    }
}

async fn get_project(Path(id): Path<String>) -> Response {
    if id != "p1" {
        return error(StatusCode::NOT_FOUND, "Project not found");
    }
    Json(json!({
        "_id": "p1",
        "title": "Website",
        "description": "Relaunch",
        "team": team()
    }))
    .into_response()
}

async fn project_tasks(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let state = state.lock().unwrap();
    let tasks: Vec<Value> = state
        .tasks
        .iter()
        .filter(|t| t["projectId"] == id.as_str())
        .cloned()
        .collect();
    Json(Value::Array(tasks))
}

async fn create_task(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.next_id += 1;
    let id = format!("new-{}", state.next_id);
    body["_id"] = json!(id);
    state.tasks.push(body);
    (StatusCode::CREATED, Json(json!({ "insertedId": id }))).into_response()
}

async fn update_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_updates {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database unavailable" })),
        )
            .into_response();
    }
    match state.tasks.iter_mut().find(|t| t["_id"] == id.as_str()) {
        Some(task) => {
            task["status"] = body["status"].clone();
            Json(json!({ "modifiedCount": 1 })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Task not found"),
    }
}

async fn delete_task(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.tasks.len();
    state.tasks.retain(|t| t["_id"] != id.as_str());
    if state.tasks.len() == before {
        return error(StatusCode::NOT_FOUND, "Task not found");
    }
    Json(json!({ "deletedCount": 1 })).into_response()
}

async fn dashboard_stats() -> Json<Value> {
    Json(json!({
        "totalProjects": 1,
        "totalTasks": 5,
        "workload": [
            { "_id": "Alice", "count": 3 },
            { "name": "Bob", "taskCount": 1 }
        ],
        "logs": [
            { "message": "Moved Schema", "timestamp": "2026-10-18T09:30:00Z" }
        ]
    }))
}

async fn rebalance(Json(body): Json<Value>) -> Response {
    if body["email"] != EMAIL {
        return error(StatusCode::BAD_REQUEST, "email required");
    }
    Json(json!({ "message": "Rebalanced 1 task" })).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/users", post(sync_user))
        .route("/api/teams", get(list_teams))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/project/{id}", get(project_tasks))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/dashboard/rebalance", post(rebalance))
        .with_state(state)
}

/// Start the mock on an ephemeral port; returns its base URL and shared state.
async fn spawn_mock() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(MockState {
        tasks: seed_tasks(),
        ..Default::default()
    }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

mod client_calls {
    use super::*;

    #[tokio::test]
    async fn test_sync_user_existing_and_new() {
        let (url, _) = spawn_mock().await;
        let api = client(&url);

        let existing = api
            .sync_user(&NewUser {
                name: "Owner".into(),
                email: EMAIL.into(),
            })
            .await
            .unwrap();
        assert!(existing.user_synced());

        let fresh = api
            .sync_user(&NewUser {
                name: "New".into(),
                email: "new@example.com".into(),
            })
            .await
            .unwrap();
        assert_eq!(fresh.inserted_id.as_deref(), Some("u-new"));
    }

    #[tokio::test]
    async fn test_list_teams_sends_email_query() {
        let (url, state) = spawn_mock().await;
        let teams = client(&url).list_teams(EMAIL).await.unwrap();

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].members[1].capacity, 3);
        assert_eq!(state.lock().unwrap().seen_emails, vec![EMAIL.to_string()]);
    }

    #[tokio::test]
    async fn test_project_with_tasks() {
        let (url, _) = spawn_mock().await;
        let (project, tasks) = client(&url).project_with_tasks("p1").await.unwrap();

        assert_eq!(project.team_name(), "Core");
        assert_eq!(project.members().len(), 2);
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[4].assigned_to, Assignee::Unassigned);
    }

    #[tokio::test]
    async fn test_missing_project_maps_status_and_message() {
        let (url, _) = spawn_mock().await;
        let err = client(&url).get_project("nope").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Project not found"));
    }

    #[tokio::test]
    async fn test_create_task_then_list() {
        let (url, _) = spawn_mock().await;
        let api = client(&url);

        let created = api
            .create_task(&NewTask {
                title: "Write docs".into(),
                description: String::new(),
                priority: Priority::High,
                status: TaskStatus::Pending,
                assigned_to: Assignee::from("Bob".to_string()),
                project_id: "p1".into(),
                email: EMAIL.into(),
            })
            .await
            .unwrap();
        assert_eq!(created.inserted_id.as_deref(), Some("new-1"));

        let tasks = api.list_project_tasks("p1").await.unwrap();
        let added = tasks.iter().find(|t| t.id == "new-1").unwrap();
        assert_eq!(added.assigned_to.as_str(), "Bob");
        assert_eq!(added.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (url, state) = spawn_mock().await;
        let api = client(&url);

        api.delete_task("t5").await.unwrap();
        assert_eq!(state.lock().unwrap().tasks.len(), 4);

        let err = api.delete_task("t5").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_rebalance() {
        let (url, _) = spawn_mock().await;
        let result = client(&url).rebalance(EMAIL).await.unwrap();
        assert_eq!(result.message, "Rebalanced 1 task");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let err = client("http://127.0.0.1:9").list_teams(EMAIL).await.unwrap_err();
        assert!(err.status().is_none());
        assert!(err.to_string().contains("GET /api/teams"));
    }
}

mod status_moves {
    use super::*;

    #[tokio::test]
    async fn test_move_persists_on_server() {
        let (url, state) = spawn_mock().await;
        let api = client(&url);
        let mut board = Board::new(api.list_project_tasks("p1").await.unwrap());

        let changed = sync_status_change(&api, &mut board, "t2", TaskStatus::Done)
            .await
            .unwrap();

        assert!(changed);
        assert_eq!(board.get("t2").unwrap().status, TaskStatus::Done);
        let state = state.lock().unwrap();
        let t2 = state.tasks.iter().find(|t| t["_id"] == "t2").unwrap();
        assert_eq!(t2["status"], "Done");
    }

    #[tokio::test]
    async fn test_move_rolls_back_on_server_error() {
        let (url, state) = spawn_mock().await;
        state.lock().unwrap().fail_updates = true;
        let api = client(&url);
        let mut board = Board::new(api.list_project_tasks("p1").await.unwrap());

        let err = sync_status_change(&api, &mut board, "t4", TaskStatus::InProgress)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("database unavailable"));
        assert_eq!(board.get("t4").unwrap().status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_same_status_skips_request() {
        let (url, state) = spawn_mock().await;
        state.lock().unwrap().fail_updates = true;
        let api = client(&url);
        let mut board = Board::new(api.list_project_tasks("p1").await.unwrap());

        let changed = sync_status_change(&api, &mut board, "t4", TaskStatus::Pending)
            .await
            .unwrap();
        assert!(!changed);
    }
}

mod workload_over_api {
    use super::*;

    #[tokio::test]
    async fn test_report_from_fetched_project() {
        let (url, _) = spawn_mock().await;
        let (project, tasks) = client(&url).project_with_tasks("p1").await.unwrap();

        let report = WorkloadBalancer::new(TieBreak::InputOrder).report(project.members(), &tasks);

        assert_eq!(report.load_by_member["Alice"], 2);
        assert_eq!(report.load_by_member["Bob"], 1);
        assert_eq!(report.recommended.unwrap().name, "Bob");
        assert!(report.over_capacity);
    }

    #[tokio::test]
    async fn test_dashboard_merge() {
        let (url, _) = spawn_mock().await;
        let (stats, teams) = client(&url).dashboard(EMAIL).await.unwrap();

        assert_eq!(stats.total_tasks, 5);
        let rows = merge_dashboard_workload(&teams, &stats);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].count, 3);
        assert!(rows[0].overloaded());
        assert_eq!(rows[0].utilization_percent(), 150);
        assert_eq!(rows[1].count, 1);
        assert!(!rows[1].overloaded());
    }
}

/// Drives the binary against the mock. The command blocks, so it runs off the
/// runtime thread while the server keeps serving.
mod cli_against_mock {
    use super::*;
    use std::path::Path as FsPath;

    fn run(dir: &FsPath, url: &str, args: &[String]) -> assert_cmd::assert::Assert {
        let mut cmd = cargo_bin_cmd!("plancraft");
        cmd.current_dir(dir)
            .env("PLANCRAFT_CONFIG_DIR", dir)
            .env_remove("PLANCRAFT_LOG")
            .env("PLANCRAFT_API_URL", url)
            .args(args);
        cmd.assert()
    }

    async fn run_async(dir: &TempDir, url: &str, args: &[&str]) -> assert_cmd::assert::Assert {
        let dir = dir.path().to_path_buf();
        let url = url.to_string();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        tokio::task::spawn_blocking(move || run(&dir, &url, &args))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_workload_json() {
        let (url, _) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["workload", "p1", "--json"])
            .await
            .success()
            .stdout(predicate::str::contains("\"loadByMember\""))
            .stdout(predicate::str::contains("\"overCapacity\": true"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_task_auto_assigns_least_loaded() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["login", "--email", EMAIL]).await.success();
        run_async(
            &dir,
            &url,
            &["tasks", "add", "p1", "--title", "Fix login", "--auto"],
        )
        .await
        .success()
        .stdout(predicate::str::contains("Auto-Selected"))
        .stdout(predicate::str::contains("Task Added: Fix login -> Bob"));

        let state = state.lock().unwrap();
        let added = state.tasks.last().unwrap();
        assert_eq!(added["assignedTo"], "Bob");
        assert_eq!(added["priority"], "Low");
        assert_eq!(added["email"], EMAIL);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_task_over_capacity_with_yes() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["login", "--email", EMAIL]).await.success();
        run_async(
            &dir,
            &url,
            &["--yes", "tasks", "add", "p1", "--title", "Hotfix", "--assign", "Alice"],
        )
        .await
        .success()
        .stdout(predicate::str::contains("Alice is at capacity (2/2)."))
        .stdout(predicate::str::contains("Task Added: Hotfix -> Alice"));

        assert_eq!(state.lock().unwrap().tasks.len(), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_task_unknown_member_fails() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["login", "--email", EMAIL]).await.success();
        run_async(
            &dir,
            &url,
            &["tasks", "add", "p1", "--title", "Orphan", "--assign", "Mallory"],
        )
        .await
        .failure()
        .stderr(predicate::str::contains("Mallory"));

        assert_eq!(state.lock().unwrap().tasks.len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_assign_auto_is_a_member_name() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["login", "--email", EMAIL]).await.success();
        run_async(
            &dir,
            &url,
            &["tasks", "add", "p1", "--title", "Literal", "--assign", "auto"],
        )
        .await
        .failure()
        .stderr(predicate::str::contains("'auto' is not a member"));

        assert_eq!(state.lock().unwrap().tasks.len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delete_removes_task_and_shows_board() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["--yes", "tasks", "delete", "t5", "--project", "p1"])
            .await
            .success()
            .stdout(predicate::str::contains("Delete task 'Backlog item'?"))
            .stdout(predicate::str::contains("Deleted! Your task has been deleted."))
            .stdout(predicate::str::contains("Pending (2)"))
            // Only the prompt names it; the redrawn board no longer does.
            .stdout(predicate::str::contains("Backlog item").count(1));

        let state = state.lock().unwrap();
        assert_eq!(state.tasks.len(), 4);
        assert!(state.tasks.iter().all(|t| t["_id"] != "t5"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delete_unknown_task_sends_nothing() {
        let (url, state) = spawn_mock().await;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["--yes", "tasks", "delete", "t9", "--project", "p1"])
            .await
            .failure()
            .stderr(predicate::str::contains("Task t9 is not on project Website"));

        assert_eq!(state.lock().unwrap().tasks.len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_move_failure_reports_rollback() {
        let (url, state) = spawn_mock().await;
        state.lock().unwrap().fail_updates = true;
        let dir = TempDir::new().unwrap();

        run_async(&dir, &url, &["tasks", "move", "t4", "done", "--project", "p1"])
            .await
            .failure()
            .stderr(predicate::str::contains("database unavailable"));
    }

    #[test]
    fn test_unreachable_board_fails() {
        let dir = TempDir::new().unwrap();
        run(
            dir.path(),
            "http://127.0.0.1:9",
            &["tasks".into(), "board".into(), "p1".into()],
        )
            .failure()
            .stderr(predicate::str::contains("Project not found"));
    }
}
