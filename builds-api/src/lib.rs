pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod integrations;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

pub use database::Database;
pub use error::{BuildError, BuildResult};
pub use state::AppState;
