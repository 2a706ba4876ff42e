//! Football roster REST API: leagues own teams, players join teams through
//! memberships. A player's memberships must stay within a single league, and
//! player updates are guarded by an opaque version token.

pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;

pub use audit::{Actor, Stamp};
pub use config::AppConfig;
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
