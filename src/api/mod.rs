//! HTTP API exposing the deploy flow and contract operations

pub mod handlers;
pub mod server;
pub mod types;
