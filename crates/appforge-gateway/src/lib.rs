pub mod config;
pub mod routes;

pub use routes::{router, AppState};
