pub mod assign;
pub mod board;
pub mod client;
pub mod config;
pub mod errors;
pub mod gates;
pub mod logging;
pub mod models;
pub mod session;
pub mod ui;
pub mod workload;
