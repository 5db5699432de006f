//! CLI command implementations

pub mod navigate;
pub mod routes;

pub use navigate::{navigate_command, navigate_to_command};
pub use routes::routes_command;
