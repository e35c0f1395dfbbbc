//! Axum-based HTTP server and real-time session gateway for copystream.
//!
//! This module is responsible for setting up the HTTP server, configuring
//! routes, and handling the persistent WebSocket sessions over which clients
//! submit generation jobs and receive progress events.
//!
//! # Components
//!
//! - `handlers`: Implementation of the request/response endpoints (health, metrics).
//! - `session`: The WebSocket session gateway: job fan-out and event relay.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod routes;
mod session;

pub use routes::{create_router, AppState};
