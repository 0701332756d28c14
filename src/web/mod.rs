//! Web API module for SHED.
//!
//! The HTTP surface of the depot: file retrieval with optional on-the-fly
//! image scaling, folder-preserving bulk upload, health check and API docs.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
