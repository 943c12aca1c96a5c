//! pozos-api: a student records HTTP service.
//!
//! Exposes create, list and consume-on-read operations over student records
//! stored in PostgreSQL, guarded by a single basic-auth credential, plus an
//! unauthenticated health probe.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
