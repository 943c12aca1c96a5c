//! HTTP server module.
//!
//! Serves plain HTTP; TLS termination is left to the surrounding proxy.
//! The server drains in-flight requests on SIGTERM/SIGINT before exiting.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
