//! HTTP server for formdiff.
//!
//! A thin transport over [`formdiff_classify`]: `POST /compare` takes the
//! original and modified form definitions and answers with the change
//! report. Cross-origin requests are allowed.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::CompareRequest;
pub use server::FormdiffServer;
