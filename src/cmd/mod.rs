//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled                    |
//! |-------------|-------------------------------------|
//! | `session`   | `Login`, `Logout`, `Whoami`         |
//! | `teams`     | `Teams`                             |
//! | `projects`  | `Projects`                          |
//! | `tasks`     | `Tasks`                             |
//! | `workload`  | `Workload`                          |
//! | `dashboard` | `Dashboard`                         |
//! | `config`    | `Config`                            |

pub mod config;
pub mod dashboard;
pub mod projects;
pub mod session;
pub mod tasks;
pub mod teams;
pub mod workload;

pub use config::cmd_config;
pub use dashboard::cmd_dashboard;
pub use projects::cmd_projects;
pub use session::{cmd_login, cmd_logout, cmd_whoami};
pub use tasks::cmd_tasks;
pub use teams::cmd_teams;
pub use workload::cmd_workload;

use anyhow::{Context, Result};

use plancraft::client::ApiClient;
use plancraft::config::PlanCraftConfig;
use plancraft::gates::ConfirmGate;
use plancraft::session::{Session, SessionStore};
use plancraft::workload::WorkloadBalancer;

/// Everything a command needs, resolved once from the CLI flags.
pub struct AppContext {
    pub config: PlanCraftConfig,
    pub yes: bool,
}

impl AppContext {
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config.base_url(), self.config.timeout())
            .context("Failed to create API client")
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.config.session_path.clone())
    }

    /// The signed-in user; fails for commands that need identity.
    pub fn session(&self) -> Result<Session> {
        Ok(self.sessions().require()?)
    }

    pub fn balancer(&self) -> WorkloadBalancer {
        WorkloadBalancer::new(self.config.tie_break())
    }

    pub fn gate(&self) -> ConfirmGate {
        ConfirmGate::new(self.yes)
    }
}
