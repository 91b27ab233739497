pub mod app;
pub mod config;
pub mod error;
pub mod gql;
pub mod services;
pub mod state;

pub use state::AppState;
