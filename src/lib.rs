pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod server;
pub mod types;
pub mod validation;

pub use server::{app, AppState, TodoService};
