//! HTTP API: per-service routers, wiring, and request/response mapping.

pub mod app;
pub mod middleware;
