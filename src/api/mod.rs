//! Browser-facing HTTP layer.
//!
//! Serves the single-page UI at `/` and JSON endpoints under `/api/`.
//! Handlers hand blocking pipeline work to tokio's blocking pool.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::build_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
