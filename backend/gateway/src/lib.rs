//! IceBot Gateway HTTP API Server
//!
//! JSON endpoints for generation, enhancement, photo analysis, feedback, and
//! the conversation and saved-message stores.

pub mod error;
pub mod routes;
pub mod server;
pub mod user;

pub use error::{ApiError, FailedAction};
pub use server::{build_router, start_server, GatewayState};
pub use user::UserId;
