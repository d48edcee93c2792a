pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod series;
pub mod sources;
pub mod state;
pub mod stats;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::router;
pub use config::Settings;
pub use dashboard::Dashboard;
pub use sources::load_snapshot;
pub use state::{AppState, Snapshot};
